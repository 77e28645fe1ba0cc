use crate::BoardError;
use serde::Serialize;

pub const FLASH_PAGE_SIZE: u32 = 4096;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PartitionType {
    /// Vendor radio stack, never overwritten by the application
    Softdevice,
    /// Firmware image
    Application,
    /// Code saved by the interpreter at runtime
    SavedCode,
    /// Flash filesystem
    Filesystem,
    Bootloader,
}

/// A run of whole flash pages
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    pub typ: PartitionType,
    pub first_page: u32,
    pub pages: u32,
}

impl Partition {
    pub const fn new(typ: PartitionType, first_page: u32, pages: u32) -> Self {
        Self {
            typ,
            first_page,
            pages,
        }
    }

    /// First page after the partition, saturating at `u32::MAX`
    pub const fn end_page(&self) -> u32 {
        self.first_page.saturating_add(self.pages)
    }

    pub const fn from(&self, page_size: u32) -> u32 {
        self.first_page.saturating_mul(page_size)
    }

    pub const fn to(&self, page_size: u32) -> u32 {
        self.end_page().saturating_mul(page_size)
    }

    /// Everything except the application image is reserved
    pub const fn is_reserved(&self) -> bool {
        !matches!(self.typ, PartitionType::Application)
    }
}

/// Where the interpreter keeps saved code, in the shape the code generator expects
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SavedCode {
    pub address: u32,
    pub page_size: u32,
    pub pages: u32,
    /// Kilobytes left for the application image
    pub flash_available: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct FlashLayout {
    pub size_kb: u32,
    pub page_size: u32,
    pub partitions: &'static [Partition],
}

impl FlashLayout {
    pub const fn total_bytes(&self) -> u64 {
        self.size_kb as u64 * 1024
    }

    /// Zero when `page_size` is zero
    pub const fn total_pages(&self) -> u32 {
        match self.total_bytes().checked_div(self.page_size as u64) {
            Some(pages) => pages as u32,
            None => 0,
        }
    }

    pub fn partition(&self, typ: PartitionType) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.typ == typ)
    }

    pub fn reserved_pages(&self) -> u32 {
        self.partitions
            .iter()
            .filter(|p| p.is_reserved())
            .fold(0u32, |pages, p| pages.saturating_add(p.pages))
    }

    pub fn reserved_bytes(&self) -> u64 {
        u64::from(self.reserved_pages()) * u64::from(self.page_size)
    }

    pub fn flash_available_kb(&self) -> u32 {
        let reserved_kb = self.reserved_bytes() / 1024;
        self.size_kb.saturating_sub(reserved_kb as u32)
    }

    pub fn saved_code(&self) -> Option<SavedCode> {
        self.partition(PartitionType::SavedCode)
            .map(|p| SavedCode {
                address: p.from(self.page_size),
                page_size: self.page_size,
                pages: p.pages,
                flash_available: self.flash_available_kb(),
            })
    }

    /// Checks that the partitions fit in flash and do not overlap
    pub fn check(&self) -> Result<(), BoardError> {
        if self.page_size == 0 {
            return Err(BoardError::InvalidPageSize);
        }

        let reserved = self.reserved_bytes();
        let total = self.total_bytes();
        if reserved > total {
            return Err(BoardError::FlashOverflow { reserved, total });
        }

        for (i, partition) in self.partitions.iter().enumerate() {
            match partition.first_page.checked_add(partition.pages) {
                Some(end) if end <= self.total_pages() => {}
                _ => return Err(BoardError::PartitionOutOfRange(partition.typ)),
            }

            let overlaps = self.partitions[i + 1..].iter().any(|other| {
                partition.first_page < other.end_page() && other.first_page < partition.end_page()
            });
            if overlaps {
                return Err(BoardError::PartitionOverlap(partition.typ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: FlashLayout = FlashLayout {
        size_kb: 64,
        page_size: FLASH_PAGE_SIZE,
        partitions: &[
            Partition::new(PartitionType::Softdevice, 0, 4),
            Partition::new(PartitionType::Application, 4, 8),
            Partition::new(PartitionType::SavedCode, 12, 2),
            Partition::new(PartitionType::Bootloader, 14, 2),
        ],
    };

    #[test]
    pub fn saved_code_record() {
        assert_eq!(LAYOUT.total_pages(), 16);
        assert_eq!(LAYOUT.reserved_pages(), 8);
        assert_eq!(
            LAYOUT.saved_code(),
            Some(SavedCode {
                address: 12 * 4096,
                page_size: 4096,
                pages: 2,
                flash_available: 32,
            })
        );
        LAYOUT.check().unwrap();
    }

    #[test]
    pub fn overflow_is_rejected() {
        let layout = FlashLayout {
            size_kb: 16,
            ..LAYOUT
        };

        assert!(matches!(
            layout.check(),
            Err(BoardError::FlashOverflow {
                reserved: 32768,
                total: 16384
            })
        ));
    }

    #[test]
    pub fn overlap_is_rejected() {
        const PARTITIONS: &[Partition] = &[
            Partition::new(PartitionType::Softdevice, 0, 4),
            Partition::new(PartitionType::Bootloader, 3, 2),
        ];
        let layout = FlashLayout {
            partitions: PARTITIONS,
            ..LAYOUT
        };

        assert!(matches!(
            layout.check(),
            Err(BoardError::PartitionOverlap(PartitionType::Softdevice))
        ));
    }

    #[test]
    pub fn partition_past_end_is_rejected() {
        const PARTITIONS: &[Partition] = &[Partition::new(PartitionType::Bootloader, 15, 2)];
        let layout = FlashLayout {
            partitions: PARTITIONS,
            ..LAYOUT
        };

        assert!(matches!(
            layout.check(),
            Err(BoardError::PartitionOutOfRange(PartitionType::Bootloader))
        ));
    }

    #[test]
    pub fn page_count_overflow_is_rejected() {
        const PARTITIONS: &[Partition] =
            &[Partition::new(PartitionType::SavedCode, u32::MAX - 1, 4)];
        let layout = FlashLayout {
            partitions: PARTITIONS,
            ..LAYOUT
        };

        assert!(matches!(
            layout.check(),
            Err(BoardError::PartitionOutOfRange(PartitionType::SavedCode))
        ));
    }

    #[test]
    pub fn zero_page_size_is_rejected() {
        let layout = FlashLayout {
            page_size: 0,
            ..LAYOUT
        };

        assert_eq!(layout.total_pages(), 0);
        assert!(matches!(layout.check(), Err(BoardError::InvalidPageSize)));
    }
}
