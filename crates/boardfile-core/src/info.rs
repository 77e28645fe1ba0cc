use crate::{
    pins::{PinFunction, PinId, PinTable, UsartRole},
    BoardError,
};
use log::debug;
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Optional interpreter modules compiled into the firmware
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Library {
    Bluetooth,
    Net,
    Graphics,
    Crypto,
    Sha256,
    Sha512,
    Aes,
    Tls,
    Nfc,
    Neopixel,
    Filesystem,
    Jit,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct BuildConfig {
    #[serde(rename = "optimizeflags")]
    pub optimize_flags: &'static str,
    pub libraries: &'static [Library],
    /// Makefile assignments passed through to the build unchanged
    pub makefile: &'static [&'static str],
}

/// Serial console used until another console (e.g. Bluetooth) takes over
#[derive(Copy, Clone, Debug)]
pub struct Console {
    pub device: &'static str,
    pub tx: PinId,
    pub rx: PinId,
    pub baudrate: u32,
}

impl Console {
    /// USART unit behind an `EV_SERIAL<n>` console device
    pub fn usart_unit(&self) -> Option<u8> {
        let digits = self.device.strip_prefix("EV_SERIAL")?;
        if digits.starts_with('0') {
            return None;
        }
        digits.parse().ok()
    }

    /// Checks that both console pins exist and, for a serial console, carry
    /// the TX and RX functions of its USART unit.
    pub fn check_pins(&self, pins: &PinTable) -> Result<(), BoardError> {
        for (pin, role) in [(self.tx, UsartRole::Tx), (self.rx, UsartRole::Rx)] {
            let record = pins
                .find_strict(&pin.to_string())
                .map_err(|_| BoardError::ConsolePinMissing(pin.to_string()))?;

            let unit = match self.usart_unit() {
                Some(unit) => unit,
                None => {
                    debug!("Console {} is not a USART, skipping {}", self.device, pin);
                    continue;
                }
            };

            if !record.has_function(PinFunction::Usart { unit, role }) {
                return Err(BoardError::ConsoleFunctionMissing {
                    pin: pin.to_string(),
                    unit,
                    role,
                });
            }
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct BoardMetadata {
    pub name: &'static str,
    pub links: &'static [&'static str],
    pub page_link: &'static str,
    pub console: Console,
    /// Number of interpreter variables allocated in RAM
    pub variables: u32,
    pub bootloader: bool,
    /// Firmware file name, `%v` is replaced by the version
    pub binary_template: &'static str,
    pub build: BuildConfig,
}

impl BoardMetadata {
    pub fn binary_name(&self, version: &str) -> String {
        self.binary_template.replace("%v", version)
    }
}

impl Serialize for BoardMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BoardMetadata", 11)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("link", self.links)?;
        state.serialize_field("espruino_page_link", self.page_link)?;
        state.serialize_field("default_console", self.console.device)?;
        state.serialize_field("default_console_tx", &self.console.tx)?;
        state.serialize_field("default_console_rx", &self.console.rx)?;
        // The generator reads the baud rate as a string
        state.serialize_field("default_console_baudrate", &self.console.baudrate.to_string())?;
        state.serialize_field("variables", &self.variables)?;
        state.serialize_field("bootloader", &u8::from(self.bootloader))?;
        state.serialize_field("binary_name", self.binary_template)?;
        state.serialize_field("build", &self.build)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::Annotation;

    const CONSOLE: Console = Console {
        device: "EV_SERIAL1",
        tx: PinId::d(6),
        rx: PinId::d(8),
        baudrate: 9600,
    };

    fn uart_pins(unit: u8) -> PinTable {
        let mut pins = PinTable::generate(0, 31);
        pins.annotate(&[
            Annotation::new(PinId::d(6), PinFunction::Usart { unit, role: UsartRole::Tx }, 0),
            Annotation::new(PinId::d(8), PinFunction::Usart { unit, role: UsartRole::Rx }, 0),
        ])
        .unwrap();
        pins
    }

    #[test]
    pub fn console_unit() {
        assert_eq!(CONSOLE.usart_unit(), Some(1));
        let usb = Console {
            device: "EV_USBSERIAL",
            ..CONSOLE
        };
        assert_eq!(usb.usart_unit(), None);
        let padded = Console {
            device: "EV_SERIAL01",
            ..CONSOLE
        };
        assert_eq!(padded.usart_unit(), None);
    }

    #[test]
    pub fn console_pins_match_unit() {
        CONSOLE.check_pins(&uart_pins(1)).unwrap();

        let serial2 = Console {
            device: "EV_SERIAL2",
            ..CONSOLE
        };
        assert!(matches!(
            serial2.check_pins(&uart_pins(1)),
            Err(BoardError::ConsoleFunctionMissing { unit: 2, role: UsartRole::Tx, .. })
        ));
        serial2.check_pins(&uart_pins(2)).unwrap();
    }

    #[test]
    pub fn console_pins_must_exist() {
        let console = Console {
            rx: PinId::d(40),
            ..CONSOLE
        };
        assert!(matches!(
            console.check_pins(&uart_pins(1)),
            Err(BoardError::ConsolePinMissing(ref pin)) if pin == "D40"
        ));

        // Non-serial consoles only need the pins to exist
        let usb = Console {
            device: "EV_USBSERIAL",
            ..CONSOLE
        };
        usb.check_pins(&PinTable::generate(0, 31)).unwrap();
    }

    #[test]
    pub fn library_names() {
        let libraries = [Library::Sha256, Library::Neopixel, Library::Jit];
        assert_eq!(
            serde_json::to_string(&libraries).unwrap(),
            r#"["SHA256","NEOPIXEL","JIT"]"#
        );
    }
}
