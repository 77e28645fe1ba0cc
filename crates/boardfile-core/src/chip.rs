use crate::flash::FlashLayout;
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Part number, memory sizes and peripheral counts of a microcontroller
#[derive(Copy, Clone, Debug)]
pub struct Chip {
    pub part: &'static str,
    pub family: &'static str,
    pub package: &'static str,
    /// RAM in kilobytes
    pub ram_kb: u32,
    /// Core clock in MHz
    pub speed_mhz: u32,
    pub usart: u8,
    pub spi: u8,
    pub i2c: u8,
    pub adc: u8,
    pub dac: u8,
    pub flash: FlashLayout,
}

impl Serialize for Chip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Chip", 12)?;
        state.serialize_field("part", self.part)?;
        state.serialize_field("family", self.family)?;
        state.serialize_field("package", self.package)?;
        state.serialize_field("ram", &self.ram_kb)?;
        state.serialize_field("flash", &self.flash.size_kb)?;
        state.serialize_field("speed", &self.speed_mhz)?;
        state.serialize_field("usart", &self.usart)?;
        state.serialize_field("spi", &self.spi)?;
        state.serialize_field("i2c", &self.i2c)?;
        state.serialize_field("adc", &self.adc)?;
        state.serialize_field("dac", &self.dac)?;
        match self.flash.saved_code() {
            Some(saved_code) => state.serialize_field("saved_code", &saved_code)?,
            None => state.skip_field("saved_code")?,
        }
        state.end()
    }
}
