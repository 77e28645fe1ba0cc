use crate::{
    boards::BoardInfo,
    devices::DeviceMap,
    layout::Label,
    pins::PinTable,
    BoardError,
};
use log::{debug, info};
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::io::Write;

/// A board's static data together with its generated pin table, ready to be
/// handed to the code generator.
pub struct Descriptor<'a> {
    board: &'a dyn BoardInfo,
    pins: PinTable,
}

impl<'a> Descriptor<'a> {
    /// Generates the pin table, then applies the board's per-pin annotations
    /// followed by its uniform functions.
    pub fn new(board: &'a dyn BoardInfo) -> Result<Self, BoardError> {
        let mut pins = PinTable::generate_port(board.gpio_port(), board.gpio_pins());
        pins.annotate(board.pin_annotations())?;
        for (function, priority) in board.uniform_functions() {
            pins.mark_all(*function, *priority);
        }

        info!("Generated {} pins for {}", pins.len(), board.info().name);

        Ok(Self { board, pins })
    }

    pub fn pins(&self) -> &PinTable {
        &self.pins
    }

    /// Checks that everything the board refers to exists and that flash is
    /// not over-committed. Returns the first problem found.
    pub fn validate(&self) -> Result<(), BoardError> {
        if !self.pins.is_unique() {
            return Err(BoardError::DuplicatePins);
        }

        for device in self.board.devices() {
            for pin in device.pin_ids() {
                if !self.pins.contains(pin) {
                    return Err(BoardError::DevicePinMissing {
                        device: device.name.to_string(),
                        pin: pin.to_string(),
                    });
                }
            }
            debug!("Device {} ok", device.name);
        }

        self.board.info().console.check_pins(&self.pins)?;

        for layout in self.board.layouts() {
            for (_, label) in layout.labels() {
                match Label::parse(label) {
                    Ok(Label::Pin(pin)) if !self.pins.contains(pin) => {
                        return Err(BoardError::LayoutPinMissing {
                            layout: layout.title.to_string(),
                            pin: label.to_string(),
                        })
                    }
                    Ok(_) => {}
                    Err(_) => {
                        return Err(BoardError::LayoutLabelInvalid {
                            layout: layout.title.to_string(),
                            label: label.to_string(),
                        })
                    }
                }
            }

            for (pin, _) in layout.notes {
                if self.pins.find(pin).is_none() {
                    return Err(BoardError::LayoutPinMissing {
                        layout: layout.title.to_string(),
                        pin: pin.to_string(),
                    });
                }
            }
            debug!("Layout {} ok", layout.title);
        }

        self.board.chip().flash.check()?;
        debug!(
            "Flash ok, {} of {} bytes reserved",
            self.board.chip().flash.reserved_bytes(),
            self.board.chip().flash.total_bytes()
        );

        Ok(())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, BoardError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(BoardError::FailedToSerialize)
    }

    pub fn write_json(&self, mut output: impl Write, pretty: bool) -> Result<(), BoardError> {
        let result = if pretty {
            serde_json::to_writer_pretty(&mut output, self)
        } else {
            serde_json::to_writer(&mut output, self)
        };
        result.map_err(BoardError::FailedToSerialize)?;
        output.flush().map_err(BoardError::FailedToWrite)
    }
}

impl Serialize for Descriptor<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("info", self.board.info())?;
        map.serialize_entry("chip", self.board.chip())?;
        map.serialize_entry("devices", &DeviceMap(self.board.devices()))?;
        map.serialize_entry("boards", self.board.layouts())?;
        map.serialize_entry("pins", &self.pins)?;
        map.end()
    }
}
