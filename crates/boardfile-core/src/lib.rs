//! Board descriptors for firmware code generation.
//!
//! A board is described by static data (metadata, chip, onboard devices and
//! connector layouts) plus a generated pin table. [`Descriptor`] puts the two
//! together and emits the JSON artifact the header and documentation
//! generators consume.

use crate::{boards::BoardInfo, flash::PartitionType, pins::UsartRole};
use std::io::Write;

use log::*;
use thiserror::Error;

pub use descriptor::Descriptor;

pub mod boards;
pub mod chip;
pub mod descriptor;
pub mod devices;
pub mod flash;
pub mod info;
pub mod layout;
pub mod pins;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Pin {0} not found")]
    PinNotFound(String),
    #[error("'{0}' is not a valid pin name")]
    InvalidPinName(String),
    #[error("'{0}' is not a valid pin function")]
    InvalidPinFunction(String),
    #[error("'{0}' is neither a pin nor a fixed connector label")]
    InvalidLabel(String),
    #[error("The pin table contains duplicate pins")]
    DuplicatePins,
    #[error("Device {device} uses pin {pin} which is not in the pin table")]
    DevicePinMissing { device: String, pin: String },
    #[error("Console pin {0} is not in the pin table")]
    ConsolePinMissing(String),
    #[error("Console pin {pin} has no USART{unit} {role:?} function")]
    ConsoleFunctionMissing {
        pin: String,
        unit: u8,
        role: UsartRole,
    },
    #[error("Layout '{layout}' uses pin {pin} which is not in the pin table")]
    LayoutPinMissing { layout: String, pin: String },
    #[error("Layout '{layout}' has unknown label '{label}'")]
    LayoutLabelInvalid { layout: String, label: String },
    #[error("Flash page size must not be zero")]
    InvalidPageSize,
    #[error("Flash partitions reserve {reserved} bytes but the chip only has {total}")]
    FlashOverflow { reserved: u64, total: u64 },
    #[error("Flash partition {0:?} overlaps another partition")]
    PartitionOverlap(PartitionType),
    #[error("Flash partition {0:?} extends past the end of flash")]
    PartitionOutOfRange(PartitionType),
    #[error("Failed to serialize descriptor")]
    FailedToSerialize(serde_json::Error),
    #[error("Failed to write to output")]
    FailedToWrite(std::io::Error),
}

/// Builds, validates and writes the descriptor of `board` as JSON.
pub fn describe(board: &dyn BoardInfo, output: impl Write, pretty: bool) -> Result<(), BoardError> {
    let descriptor = Descriptor::new(board)?;
    descriptor.validate()?;

    debug!(
        "Writing descriptor for {} with {} devices and {} layouts",
        board.board_name(),
        board.devices().len(),
        board.layouts().len()
    );

    descriptor.write_json(output, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn describe_mdbt42q() {
        let mut bytes_out = Vec::new();
        describe(&boards::MDBT42Q, &mut bytes_out, false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&bytes_out).unwrap();
        assert_eq!(value["info"]["name"], "MDBT42Q Module");
        assert_eq!(value["chip"]["part"], "NRF52832");
        assert_eq!(value["boards"].as_array().unwrap().len(), 2);
    }
}
