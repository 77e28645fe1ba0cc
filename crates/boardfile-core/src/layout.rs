use crate::{pins::PinId, BoardError};
use serde::{ser::SerializeMap, Serialize, Serializer};

/// Side of a board a connector row runs along
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Edge {
    Left,
    Right,
    Right2,
    Top,
    Bottom,
}

impl Edge {
    pub const fn key(&self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Right2 => "right2",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }
}

/// Connector labels that are not general purpose pins
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FixedLabel {
    Gnd,
    Vdd,
    V3_3,
    Vin,
    Swdio,
    Swdclk,
    Dec4,
    Dcc,
}

impl FixedLabel {
    pub const ALL: [FixedLabel; 8] = [
        FixedLabel::Gnd,
        FixedLabel::Vdd,
        FixedLabel::V3_3,
        FixedLabel::Vin,
        FixedLabel::Swdio,
        FixedLabel::Swdclk,
        FixedLabel::Dec4,
        FixedLabel::Dcc,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FixedLabel::Gnd => "GND",
            FixedLabel::Vdd => "VDD",
            FixedLabel::V3_3 => "3.3",
            FixedLabel::Vin => "Vin",
            FixedLabel::Swdio => "SWDIO",
            FixedLabel::Swdclk => "SWDCLK",
            FixedLabel::Dec4 => "DEC4",
            FixedLabel::Dcc => "DCC",
        }
    }
}

/// A classified connector label
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Label {
    /// Unconnected position, drawn as a gap
    Blank,
    Fixed(FixedLabel),
    Pin(PinId),
}

impl Label {
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        if s.is_empty() {
            return Ok(Label::Blank);
        }

        if let Some(fixed) = FixedLabel::ALL.iter().find(|f| f.as_str() == s) {
            return Ok(Label::Fixed(*fixed));
        }

        s.parse::<PinId>()
            .map(Label::Pin)
            .map_err(|_| BoardError::InvalidLabel(s.to_string()))
    }
}

/// Pin arrangement of one physical form factor, used to draw documentation diagrams
#[derive(Copy, Clone, Debug)]
pub struct BoardLayout {
    pub title: &'static str,
    /// CSS class of the diagram container
    pub class: Option<&'static str>,
    /// Leave out pins that are not broken out to a connector
    pub hide_not_on_connectors: bool,
    /// Connector rows in left-right or top-bottom order
    pub edges: &'static [(Edge, &'static [&'static str])],
    pub notes: &'static [(&'static str, &'static str)],
    pub css: &'static str,
}

impl BoardLayout {
    pub fn edge(&self, edge: Edge) -> Option<&'static [&'static str]> {
        self.edges
            .iter()
            .find(|(e, _)| *e == edge)
            .map(|(_, labels)| *labels)
    }

    /// Every label of every edge, in declaration order
    pub fn labels(&self) -> impl Iterator<Item = (Edge, &'static str)> + '_ {
        self.edges
            .iter()
            .flat_map(|(edge, labels)| labels.iter().map(move |label| (*edge, *label)))
    }

    pub fn note(&self, pin: &str) -> Option<&'static str> {
        self.notes
            .iter()
            .find(|(name, _)| *name == pin)
            .map(|(_, note)| *note)
    }
}

struct Notes<'a>(&'a [(&'static str, &'static str)]);

impl Serialize for Notes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().copied())
    }
}

impl Serialize for BoardLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (edge, labels) in self.edges {
            map.serialize_entry(edge.key(), labels)?;
        }
        if self.hide_not_on_connectors {
            map.serialize_entry("_hide_not_on_connectors", &true)?;
        }
        map.serialize_entry("_title", self.title)?;
        if let Some(class) = self.class {
            map.serialize_entry("_class", class)?;
        }
        map.serialize_entry("_notes", &Notes(self.notes))?;
        map.serialize_entry("_css", self.css)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: BoardLayout = BoardLayout {
        title: "Test board",
        class: Some("board_test"),
        hide_not_on_connectors: true,
        edges: &[(Edge::Top, &["D1", "", "GND"]), (Edge::Left, &["3.3"])],
        notes: &[("D1", "Shared with the LED")],
        css: "#board { width: 10px; }",
    };

    #[test]
    pub fn classify_labels() {
        assert_eq!(Label::parse("").unwrap(), Label::Blank);
        assert_eq!(Label::parse("3.3").unwrap(), Label::Fixed(FixedLabel::V3_3));
        assert_eq!(Label::parse("SWDCLK").unwrap(), Label::Fixed(FixedLabel::Swdclk));
        assert_eq!(Label::parse("D25").unwrap(), Label::Pin(PinId::d(25)));
        assert!(matches!(Label::parse("5V"), Err(BoardError::InvalidLabel(_))));
        assert!(matches!(Label::parse("D05"), Err(BoardError::InvalidLabel(_))));
    }

    #[test]
    pub fn edges_and_notes() {
        assert_eq!(LAYOUT.edge(Edge::Top), Some(&["D1", "", "GND"][..]));
        assert_eq!(LAYOUT.edge(Edge::Bottom), None);
        assert_eq!(LAYOUT.labels().count(), 4);
        assert_eq!(LAYOUT.note("D1"), Some("Shared with the LED"));
        assert_eq!(LAYOUT.note("D2"), None);
    }

    #[test]
    pub fn layout_shape() {
        assert_eq!(
            serde_json::to_string(&LAYOUT).unwrap(),
            r##"{"top":["D1","","GND"],"left":["3.3"],"_hide_not_on_connectors":true,"_title":"Test board","_class":"board_test","_notes":{"D1":"Shared with the LED"},"_css":"#board { width: 10px; }"}"##
        );
    }
}
