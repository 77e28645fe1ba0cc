use crate::pins::PinId;
use serde::{ser::SerializeMap, Serialize, Serializer};

/// Electrical configuration a pin is put in at boot
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinState {
    In,
    InPullup,
    InPulldown,
    Out,
    OutOpenDrain,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DevicePins {
    Single(PinId),
    /// Two-terminal devices such as an NFC antenna
    Pair { a: PinId, b: PinId },
}

/// An onboard peripheral (LED, button, antenna) bound to physical pins
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Device {
    pub name: &'static str,
    pub pins: DevicePins,
    pub pinstate: Option<PinState>,
    /// Hidden from the bootloader, e.g. an LED that may not be fitted
    pub no_bootloader: bool,
}

impl Device {
    pub const fn pin(name: &'static str, pin: PinId) -> Self {
        Self {
            name,
            pins: DevicePins::Single(pin),
            pinstate: None,
            no_bootloader: false,
        }
    }

    pub const fn pair(name: &'static str, a: PinId, b: PinId) -> Self {
        Self {
            name,
            pins: DevicePins::Pair { a, b },
            pinstate: None,
            no_bootloader: false,
        }
    }

    pub const fn with_pinstate(mut self, pinstate: PinState) -> Self {
        self.pinstate = Some(pinstate);
        self
    }

    pub const fn without_bootloader(mut self) -> Self {
        self.no_bootloader = true;
        self
    }

    pub fn pin_ids(&self) -> Vec<PinId> {
        match self.pins {
            DevicePins::Single(pin) => vec![pin],
            DevicePins::Pair { a, b } => vec![a, b],
        }
    }
}

impl Serialize for Device {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self.pins {
            DevicePins::Single(pin) => map.serialize_entry("pin", &pin)?,
            DevicePins::Pair { a, b } => {
                map.serialize_entry("pin_a", &a)?;
                map.serialize_entry("pin_b", &b)?;
            }
        }
        if let Some(pinstate) = self.pinstate {
            map.serialize_entry("pinstate", &pinstate)?;
        }
        if self.no_bootloader {
            map.serialize_entry("no_bootloader", &true)?;
        }
        map.end()
    }
}

/// Serializes devices as a map keyed by device name, keeping declaration order
pub struct DeviceMap<'a>(pub &'a [Device]);

impl Serialize for DeviceMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|device| (device.name, device)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn device_shapes() {
        let devices = [
            Device::pin("LED2", PinId::d(2)).without_bootloader(),
            Device::pin("BTN1", PinId::d(0)).with_pinstate(PinState::InPulldown),
            Device::pair("NFC", PinId::d(9), PinId::d(10)),
        ];

        assert_eq!(
            serde_json::to_string(&DeviceMap(&devices)).unwrap(),
            r#"{"LED2":{"pin":"D2","no_bootloader":true},"BTN1":{"pin":"D0","pinstate":"IN_PULLDOWN"},"NFC":{"pin_a":"D9","pin_b":"D10"}}"#
        );
        assert_eq!(devices[2].pin_ids(), [PinId::d(9), PinId::d(10)]);
    }
}
