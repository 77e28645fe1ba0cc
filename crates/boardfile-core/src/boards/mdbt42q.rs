// Raytac MDBT42Q module, built around the nRF52832.
// See https://espruino.com/MDBT42Q

use crate::{
    boards::BoardInfo,
    chip::Chip,
    devices::{Device, PinState},
    flash::{FlashLayout, Partition, PartitionType, FLASH_PAGE_SIZE},
    info::{BoardMetadata, BuildConfig, Console, Library},
    layout::{BoardLayout, Edge},
    pins::{Annotation, PinFunction, PinId, Priority, UsartRole},
};
use static_assertions::const_assert;
use std::ops::RangeInclusive;

#[derive(Debug, Default, Clone)]
pub struct MDBT42Q;

impl BoardInfo for MDBT42Q {
    fn board_name(&self) -> &'static str {
        "mdbt42q"
    }

    fn info(&self) -> &BoardMetadata {
        &MDBT42Q_INFO
    }

    fn chip(&self) -> &Chip {
        &NRF52832
    }

    fn devices(&self) -> &[Device] {
        MDBT42Q_DEVICES
    }

    fn layouts(&self) -> &[BoardLayout] {
        MDBT42Q_LAYOUTS
    }

    fn gpio_pins(&self) -> RangeInclusive<u8> {
        0..=31
    }

    fn pin_annotations(&self) -> &[Annotation] {
        MDBT42Q_PIN_FUNCTIONS
    }

    fn uniform_functions(&self) -> &[(PinFunction, Priority)] {
        // No pin is 5V tolerant
        &[(PinFunction::Only3v3, 0)]
    }
}

pub const FLASH_SIZE_KB: u32 = 512;
pub const FLASH_PAGES: u32 = FLASH_SIZE_KB * 1024 / FLASH_PAGE_SIZE;

pub const SOFTDEVICE_PAGES: u32 = 31;
pub const SAVED_CODE_PAGES: u32 = 10;
pub const FILESYSTEM_PAGES: u32 = 2;
pub const BOOTLOADER_PAGES: u32 = 8;

pub const BOOTLOADER_FIRST_PAGE: u32 = FLASH_PAGES - BOOTLOADER_PAGES;
pub const FILESYSTEM_FIRST_PAGE: u32 = BOOTLOADER_FIRST_PAGE - FILESYSTEM_PAGES;
pub const SAVED_CODE_FIRST_PAGE: u32 = FILESYSTEM_FIRST_PAGE - SAVED_CODE_PAGES;
pub const APPLICATION_PAGES: u32 = SAVED_CODE_FIRST_PAGE - SOFTDEVICE_PAGES;

const_assert!(
    SOFTDEVICE_PAGES + SAVED_CODE_PAGES + FILESYSTEM_PAGES + BOOTLOADER_PAGES <= FLASH_PAGES
);
const_assert!(SAVED_CODE_FIRST_PAGE == 108);

pub const MDBT42Q_PARTITIONS: &[Partition] = &[
    Partition::new(PartitionType::Softdevice, 0, SOFTDEVICE_PAGES),
    Partition::new(
        PartitionType::Application,
        SOFTDEVICE_PAGES,
        APPLICATION_PAGES,
    ),
    Partition::new(
        PartitionType::SavedCode,
        SAVED_CODE_FIRST_PAGE,
        SAVED_CODE_PAGES,
    ),
    Partition::new(
        PartitionType::Filesystem,
        FILESYSTEM_FIRST_PAGE,
        FILESYSTEM_PAGES,
    ),
    Partition::new(
        PartitionType::Bootloader,
        BOOTLOADER_FIRST_PAGE,
        BOOTLOADER_PAGES,
    ),
];

pub static NRF52832: Chip = Chip {
    part: "NRF52832",
    family: "NRF52",
    package: "QFN48",
    ram_kb: 64,
    speed_mhz: 64,
    usart: 1,
    spi: 1,
    i2c: 1,
    adc: 1,
    dac: 0,
    flash: FlashLayout {
        size_kb: FLASH_SIZE_KB,
        page_size: FLASH_PAGE_SIZE,
        partitions: MDBT42Q_PARTITIONS,
    },
};

pub static MDBT42Q_INFO: BoardMetadata = BoardMetadata {
    name: "MDBT42Q Module",
    links: &["https://espruino.com/MDBT42Q"],
    page_link: "MDBT42Q",
    console: Console {
        device: "EV_SERIAL1",
        tx: PinId::d(6),
        rx: PinId::d(8),
        baudrate: 9600,
    },
    // RAM overflows at link time if this is too high
    variables: 2950,
    bootloader: true,
    binary_template: "espruino_%v_mdbt42q.hex",
    build: BuildConfig {
        optimize_flags: "-Os",
        libraries: &[
            Library::Bluetooth,
            Library::Net,
            Library::Graphics,
            Library::Crypto,
            Library::Sha256,
            Library::Nfc,
            Library::Neopixel,
            Library::Filesystem,
            Library::Jit,
        ],
        makefile: &[
            // Production nRF52s still need this
            "DEFINES+=-DHAL_NFC_ENGINEERING_BC_FTPAN_WORKAROUND=1",
            "DEFINES+=-DCONFIG_GPIO_AS_PINRESET",
            // MTU 53 and two central links, RAM base moves to match
            "DEFINES += -DNRF_BLE_GATT_MAX_MTU_SIZE=53 -DNRF_BLE_MAX_MTU_SIZE=53",
            "DEFINES += -DCENTRAL_LINK_COUNT=2 -DNRF_SDH_BLE_CENTRAL_LINK_COUNT=2",
            "LDFLAGS += -Xlinker --defsym=LD_APP_RAM_BASE=0x3290",
            "LDFLAGS += -nostartfiles",
            "ASFLAGS += -D__STARTUP_CLEAR_BSS -D__START=main",
            r#"DEFINES+=-DBLUETOOTH_NAME_PREFIX='"MDBT42Q"'"#,
            // Neopixel output needs explicit SCK and LRCK pins
            "DEFINES+=-DNEOPIXEL_SCK_PIN=23 -DNEOPIXEL_LRCK_PIN=13",
            "DEFINES += -DESPR_USE_STEPPER_TIMER=1",
            "DEFINES+=-DESPR_PACKED_SYMPTR",
            "DEFINES+=-DESPR_NO_REGEX_OPTIMISE",
            "DFU_PRIVATE_KEY=targets/nrf5x_dfu/dfu_private_key.pem",
            "DFU_SETTINGS=--application-version 0xff --hw-version 52 --sd-req 0x8C,0x91",
        ],
    },
};

pub const MDBT42Q_DEVICES: &[Device] = &[
    Device::pin("LED1", PinId::d(1)),
    // May be a bare module, so the bootloader leaves LED2 alone
    Device::pin("LED2", PinId::d(2)).without_bootloader(),
    Device::pin("BTN1", PinId::d(0)).with_pinstate(PinState::InPulldown),
    Device::pair("NFC", PinId::d(9), PinId::d(10)),
];

const fn adc(pin: u8, channel: u8) -> Annotation {
    Annotation::new(PinId::d(pin), PinFunction::Adc { unit: 1, channel }, 0)
}

pub const MDBT42Q_PIN_FUNCTIONS: &[Annotation] = &[
    Annotation::new(PinId::d(0), PinFunction::Xl1, 0),
    Annotation::new(PinId::d(1), PinFunction::Xl2, 0),
    Annotation::new(PinId::d(9), PinFunction::Nfc1, 0),
    Annotation::new(PinId::d(10), PinFunction::Nfc2, 0),
    adc(2, 0),
    adc(3, 1),
    adc(4, 2),
    adc(5, 3),
    adc(28, 4),
    Annotation::new(
        PinId::d(6),
        PinFunction::Usart {
            unit: 1,
            role: UsartRole::Tx,
        },
        0,
    ),
    Annotation::new(
        PinId::d(8),
        PinFunction::Usart {
            unit: 1,
            role: UsartRole::Rx,
        },
        0,
    ),
    adc(29, 5),
    adc(30, 6),
    adc(31, 7),
];

pub const MDBT42Q_LAYOUTS: &[BoardLayout] = &[MODULE_LAYOUT, BREAKOUT_LAYOUT];

pub const MODULE_LAYOUT: BoardLayout = BoardLayout {
    title: "MDBT42Q module",
    class: None,
    hide_not_on_connectors: false,
    edges: &[
        (
            Edge::Left,
            &[
                "GND", "", "", "", "D25", "D26", "D27", "D28", "D29", "D30", "D31", "DEC4", "DCC",
                "VDD",
            ],
        ),
        (Edge::Right2, &["D24", "", "D23"]),
        (
            Edge::Right,
            &[
                "GND", "D22", "SWDIO", "SWDCLK", "D21", "D20", "D19", "D18", "D17", "D16", "D15",
                "D14", "D13", "D12", "D11",
            ],
        ),
        (
            Edge::Bottom,
            &[
                "GND", "D0", "D1", "D2", "D3", "D4", "D5", "D6", "D7", "D8", "D9", "D10", "GND",
            ],
        ),
    ],
    notes: &[
        // Pin reset has to be enabled on the nRF52832 for this
        ("D21", "Also NRST if configured"),
        (
            "D13",
            "This is used as LRCK when driving Neopixels, and will output a signal when 'require('neopixel').write' is called",
        ),
        (
            "D23",
            "This is used as SCK when driving Neopixels, and will output a signal when 'require('neopixel').write' is called",
        ),
    ],
    css: r#"
#board {
  width: 359px;
  height: 484px;
  top: 0px;
  left : 200px;
  background-image: url(img/MDBT42Q.jpg);
}
#boardcontainer {
  height: 650px;
}
#board #bottom {
    top: 440px;
    left: 56px;
}
#board #left {
    top: 115px;
    right: 316px;
}
#board #right2 {
    top: 115px;
    right: 110px;
}
#board #right {
    top: 115px;
    left: 316px;
}

#board .leftpin { height: 17px; }
#board .left2pin { height: 17px; }
#board .rightpin { height: 17px; }
#board .bottompin { width: 15px; padding:0px; }
"#,
};

pub const BREAKOUT_LAYOUT: BoardLayout = BoardLayout {
    title: "MDBT42Q breakout board",
    class: Some("board_breakout"),
    hide_not_on_connectors: true,
    edges: &[
        (
            Edge::Left,
            &[
                "D25", "D26", "D27", "D28", "D29", "D30", "D31", "D3", "D4", "D5", "D11",
            ],
        ),
        (
            Edge::Right,
            &[
                "D22", "D20", "D19", "D18", "D17", "D16", "D15", "D14", "3.3", "Vin", "GND",
            ],
        ),
        (Edge::Bottom, &["D6", "D8", "D7", "Vin", "GND"]),
        (Edge::Top, &["D9", "D10"]),
    ],
    notes: &[
        ("D8", "Serial Console RX when Bluetooth disconnected"),
        ("D6", "Serial Console TX when Bluetooth disconnected"),
    ],
    css: r#"
#board {
  width: 255px;
  height: 400px;
  top: 0px;
  left : 200px;
  background-image: url(img/MDBT42Q_BREAKOUT.png);
}
#boardcontainer {
  height: 600px;
}
#board #bottom {
    top: 410px;
    left: 40px;
}
#board #top {
    bottom: 75px;
    left: 167px;
}
#board #left {
    top: 17px;
    right: 256px;
}
#board #right {
    top: 17px;
    left: 256px;
}

#board .leftpin { height: 33px; }
#board .rightpin { height: 33px; }
#board .toppin { width: 15px; padding:0px; }
#board .bottompin { width: 31px; padding:0px; }
"#,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn flash_partitions() {
        let flash = &NRF52832.flash;
        flash.check().unwrap();

        assert_eq!(flash.total_pages(), 128);
        assert_eq!(flash.reserved_pages(), 31 + 8 + 2 + 10);
        assert!(flash.reserved_bytes() <= 512 * 1024);

        let saved_code = flash.saved_code().unwrap();
        assert_eq!(saved_code.address, (118 - 10) * 4096);
        assert_eq!(saved_code.page_size, 4096);
        assert_eq!(saved_code.pages, 10);
        assert_eq!(saved_code.flash_available, 512 - ((31 + 8 + 2 + 10) * 4));

        let bootloader = flash.partition(PartitionType::Bootloader).unwrap();
        assert_eq!(bootloader.from(FLASH_PAGE_SIZE), 120 * 4096);
        assert_eq!(bootloader.to(FLASH_PAGE_SIZE), 512 * 1024);
    }

    #[test]
    pub fn binary_name() {
        assert_eq!(
            MDBT42Q_INFO.binary_name("2v25"),
            "espruino_2v25_mdbt42q.hex"
        );
    }

    #[test]
    pub fn layouts_do_not_share_pin_lists() {
        let module = MODULE_LAYOUT.edge(Edge::Left).unwrap();
        let breakout = BREAKOUT_LAYOUT.edge(Edge::Left).unwrap();
        assert_ne!(module.as_ptr(), breakout.as_ptr());
    }
}
