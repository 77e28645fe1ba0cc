pub use mdbt42q::MDBT42Q;

use crate::{
    chip::Chip,
    devices::Device,
    info::BoardMetadata,
    layout::BoardLayout,
    pins::{Annotation, PinFunction, Priority, DEFAULT_PORT},
};
use std::ops::RangeInclusive;

pub mod mdbt42q;

/// This is a helper struct, which allows you to iterate over every board defined
pub struct BoardIter {
    inner: std::vec::IntoIter<Box<dyn BoardInfo>>,
}

impl BoardIter {
    /// Creates a new BoardIter
    pub fn new() -> Self {
        Self {
            inner: vec![Box::new(MDBT42Q) as Box<dyn BoardInfo>].into_iter(),
        }
    }

    pub fn find_by_name(name: &str) -> Option<Box<dyn BoardInfo>> {
        Self::new().find(|board| board.board_name().eq_ignore_ascii_case(name))
    }
}

impl Default for BoardIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for BoardIter {
    type Item = Box<dyn BoardInfo>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Everything the code generator needs to know about one hardware variant.
pub trait BoardInfo {
    /// Short name used to select the board, e.g. `mdbt42q`
    fn board_name(&self) -> &'static str;

    fn info(&self) -> &BoardMetadata;

    fn chip(&self) -> &Chip;

    /// Onboard peripherals in declaration order
    fn devices(&self) -> &[Device];

    /// One layout per form factor the board ships in
    fn layouts(&self) -> &[BoardLayout];

    /// Indices of the general purpose pins
    fn gpio_pins(&self) -> RangeInclusive<u8>;

    /// Optional, most single-port chips name their pins `D0`, `D1`, ...
    fn gpio_port(&self) -> char {
        DEFAULT_PORT
    }

    /// Functions of individual pins
    fn pin_annotations(&self) -> &[Annotation];

    /// Optional, functions every pin carries. These are applied after
    /// `pin_annotations` and never replace an entry already present.
    fn uniform_functions(&self) -> &[(PinFunction, Priority)] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn find_board_by_name() {
        let board = BoardIter::find_by_name("MDBT42Q").unwrap();
        assert_eq!(board.board_name(), "mdbt42q");

        assert!(BoardIter::find_by_name("rp2040").is_none());
        assert_eq!(BoardIter::new().count(), 1);
    }
}
