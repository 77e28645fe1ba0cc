use crate::BoardError;
use log::debug;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    ops::RangeInclusive,
    str::FromStr,
};

/// Port letter used for the general purpose pins of single-port chips
pub const DEFAULT_PORT: char = 'D';

/// Cost of using a pin for a function, lower is preferred
pub type Priority = u8;

/// Identifies a physical pin by port letter and index, e.g. `D21`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinId {
    port: char,
    num: u8,
}

impl PinId {
    pub const fn new(port: char, num: u8) -> Self {
        Self { port, num }
    }

    /// Pin on the default `D` port
    pub const fn d(num: u8) -> Self {
        Self::new(DEFAULT_PORT, num)
    }

    pub fn port(&self) -> char {
        self.port
    }

    pub fn num(&self) -> u8 {
        self.num
    }

    /// The name the pin table is keyed by, e.g. `PD21`
    pub fn table_name(&self) -> String {
        format!("P{}{}", self.port, self.num)
    }

    /// Zero padded name so that `D2` sorts before `D10`
    pub fn sorting_name(&self) -> String {
        format!("{}{:02}", self.port, self.num)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.port, self.num)
    }
}

impl FromStr for PinId {
    type Err = BoardError;

    /// Accepts both the short form (`D21`) and the table form (`PD21`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidPinName(s.to_string());

        let mut chars = s.chars();
        let short = match (chars.next(), chars.next()) {
            (Some('P'), Some(c)) if c.is_ascii_uppercase() => &s[1..],
            _ => s,
        };

        let mut chars = short.chars();
        let port = chars
            .next()
            .filter(|c| c.is_ascii_uppercase())
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Names are compared exactly, `D05` is not `D5`
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(invalid());
        }
        let num = digits.parse::<u8>().map_err(|_| invalid())?;

        Ok(Self::new(port, num))
    }
}

impl Serialize for PinId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UsartRole {
    Tx,
    Rx,
}

/// Electrical or alternate function a pin can take on.
///
/// The declaration order is the order functions appear in a pin record, so
/// the uniform voltage marker stays last.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PinFunction {
    /// Low frequency crystal input
    Xl1,
    /// Low frequency crystal output
    Xl2,
    /// NFC antenna pad
    Nfc1,
    Nfc2,
    /// Analog input channel
    Adc { unit: u8, channel: u8 },
    Usart { unit: u8, role: UsartRole },
    /// 3.3V only, not tolerant of higher voltages
    Only3v3,
}

impl fmt::Display for PinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinFunction::Xl1 => f.write_str("XL1"),
            PinFunction::Xl2 => f.write_str("XL2"),
            PinFunction::Nfc1 => f.write_str("NFC1"),
            PinFunction::Nfc2 => f.write_str("NFC2"),
            PinFunction::Adc { unit, channel } => write!(f, "ADC{}_IN{}", unit, channel),
            PinFunction::Usart { unit, role } => match role {
                UsartRole::Tx => write!(f, "USART{}_TX", unit),
                UsartRole::Rx => write!(f, "USART{}_RX", unit),
            },
            PinFunction::Only3v3 => f.write_str("3.3"),
        }
    }
}

impl FromStr for PinFunction {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidPinFunction(s.to_string());
        let number = |digits: &str| digits.parse::<u8>().map_err(|_| invalid());

        match s {
            "XL1" => return Ok(PinFunction::Xl1),
            "XL2" => return Ok(PinFunction::Xl2),
            "NFC1" => return Ok(PinFunction::Nfc1),
            "NFC2" => return Ok(PinFunction::Nfc2),
            "3.3" => return Ok(PinFunction::Only3v3),
            _ => {}
        }

        if let Some((unit, channel)) = s.strip_prefix("ADC").and_then(|r| r.split_once("_IN")) {
            return Ok(PinFunction::Adc {
                unit: number(unit)?,
                channel: number(channel)?,
            });
        }

        if let Some((unit, role)) = s.strip_prefix("USART").and_then(|r| r.split_once('_')) {
            let role = match role {
                "TX" => UsartRole::Tx,
                "RX" => UsartRole::Rx,
                _ => return Err(invalid()),
            };
            return Ok(PinFunction::Usart {
                unit: number(unit)?,
                role,
            });
        }

        Err(invalid())
    }
}

impl Serialize for PinFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single entry of the pin table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    id: PinId,
    functions: BTreeMap<PinFunction, Priority>,
}

impl Pin {
    pub fn new(id: PinId) -> Self {
        Self {
            id,
            functions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn functions(&self) -> &BTreeMap<PinFunction, Priority> {
        &self.functions
    }

    pub fn has_function(&self, function: PinFunction) -> bool {
        self.functions.contains_key(&function)
    }
}

impl Serialize for Pin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Pin", 6)?;
        state.serialize_field("name", &self.id.table_name())?;
        state.serialize_field("sortingname", &self.id.sorting_name())?;
        state.serialize_field("port", &self.id.port.to_string())?;
        state.serialize_field("num", &self.id.num.to_string())?;
        state.serialize_field("functions", &self.functions)?;
        // No vendor pin spreadsheet backs these boards
        state.serialize_field("csv", &BTreeMap::<String, String>::new())?;
        state.end()
    }
}

/// One declarative `(pin, function, priority)` entry applied to a pin table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub pin: PinId,
    pub function: PinFunction,
    pub priority: Priority,
}

impl Annotation {
    pub const fn new(pin: PinId, function: PinFunction, priority: Priority) -> Self {
        Self {
            pin,
            function,
            priority,
        }
    }
}

/// Ordered collection of every general purpose pin of a chip
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinTable {
    pins: Vec<Pin>,
}

impl PinTable {
    /// Generates the pins `first..=last` on the default port
    pub fn generate(first: u8, last: u8) -> Self {
        Self::generate_port(DEFAULT_PORT, first..=last)
    }

    pub fn generate_port(port: char, range: RangeInclusive<u8>) -> Self {
        let pins: Vec<Pin> = range.map(|num| Pin::new(PinId::new(port, num))).collect();
        debug!("Generated {} pins on port {}", pins.len(), port);
        Self { pins }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pin> {
        self.pins.iter()
    }

    pub fn contains(&self, id: PinId) -> bool {
        self.position(id).is_some()
    }

    /// Lenient lookup, unknown or malformed names give `None`
    pub fn find(&self, name: &str) -> Option<&Pin> {
        let id = name.parse::<PinId>().ok()?;
        self.position(id).map(|index| &self.pins[index])
    }

    /// Strict lookup, a name that is not in the table is an error
    pub fn find_strict(&self, name: &str) -> Result<&Pin, BoardError> {
        self.find(name)
            .ok_or_else(|| BoardError::PinNotFound(name.to_string()))
    }

    /// Applies every annotation in order. A later annotation of the same
    /// pin and function replaces the earlier priority.
    pub fn annotate(&mut self, annotations: &[Annotation]) -> Result<(), BoardError> {
        for annotation in annotations {
            let index = self
                .position(annotation.pin)
                .ok_or_else(|| BoardError::PinNotFound(annotation.pin.table_name()))?;

            debug!(
                "{} -> {} ({})",
                annotation.pin, annotation.function, annotation.priority
            );
            self.pins[index]
                .functions
                .insert(annotation.function, annotation.priority);
        }

        Ok(())
    }

    /// Adds `function` to every pin that does not already carry it.
    pub fn mark_all(&mut self, function: PinFunction, priority: Priority) {
        debug!("Marking all {} pins as {}", self.pins.len(), function);
        for pin in &mut self.pins {
            pin.functions.entry(function).or_insert(priority);
        }
    }

    /// Pins carrying `function`, in table order
    pub fn with_function(&self, function: PinFunction) -> impl Iterator<Item = &Pin> + '_ {
        self.pins.iter().filter(move |pin| pin.has_function(function))
    }

    /// True when no two pins share an identifier
    pub fn is_unique(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.pins.len());
        self.pins.iter().all(|pin| seen.insert(pin.id))
    }

    fn position(&self, id: PinId) -> Option<usize> {
        self.pins.iter().position(|pin| pin.id == id)
    }
}

impl<'a> IntoIterator for &'a PinTable {
    type Item = &'a Pin;
    type IntoIter = std::slice::Iter<'a, Pin>;

    fn into_iter(self) -> Self::IntoIter {
        self.pins.iter()
    }
}

impl Serialize for PinTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.pins)
    }
}
