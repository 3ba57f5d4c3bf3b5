//! ST7789 LCD (320×170 over SPI with DMA) standing in for the OLED.
//!
//! The 128×32 frame is shown in the OLED's own landscape orientation,
//! every pixel doubled, centred on the panel.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Spi,
    time::Rate,
};

use crate::{
    DisplayResources,
    framebuffer::{
        COLUMNS,
        Framebuffer,
        ROWS,
    },
    mk_static,
    render::Present,
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>,
    Output<'a>,
>;

pub type Display<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

const LCD_W: u32 = 320;
const LCD_H: u32 = 170;
const SCALE: u32 = 2;
const LIT: Rgb565 = Rgb565::WHITE;
const DARK: Rgb565 = Rgb565::BLACK;

impl<'a> From<DisplayResources<'a>> for Display<'a> {
    fn from(res: DisplayResources<'a>) -> Self {
        let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(32000);
        let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
        let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

        let mut delay = esp_hal::delay::Delay::new();

        let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
        let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
        rst.set_high();

        let spi = Spi::new(
            res.spi,
            esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(80)),
        )
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf)
        .into_async();

        let cs = Output::new(res.cs, Level::High, OutputConfig::default());
        let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

        let buffer = mk_static!([u8; 32000], [0_u8; 32000]);
        let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

        let display = mipidsi::Builder::new(mipidsi::models::ST7789, di)
            .reset_pin(rst)
            .display_size(LCD_H as u16, LCD_W as u16)
            .invert_colors(mipidsi::options::ColorInversion::Inverted)
            .orientation(mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90))
            .display_offset(35, 0)
            .init(&mut delay)
            .unwrap();
        info!("lcd initialised");
        display
    }
}

/// Presents frames on the badge LCD.
pub struct LcdScreen<'a> {
    display: &'a mut Display<'static>,
}

impl<'a> LcdScreen<'a> {
    pub fn new(display: &'a mut Display<'static>) -> Self {
        if display.clear(DARK).is_err() {
            error!("lcd clear failed");
        }
        Self { display }
    }

    fn area() -> Rectangle {
        let size = Size::new(COLUMNS as u32 * SCALE, ROWS as u32 * SCALE);
        let top_left = Point::new(((LCD_W - size.width) / 2) as i32, ((LCD_H - size.height) / 2) as i32);
        Rectangle::new(top_left, size)
    }
}

impl Present for LcdScreen<'_> {
    fn present(&mut self, frame: &Framebuffer) {
        let area = Self::area();
        let pixels = (0..area.size.height).flat_map(|y| {
            (0..area.size.width).map(move |x| {
                if frame.pixel((x / SCALE) as usize, (y / SCALE) as usize) {
                    LIT
                } else {
                    DARK
                }
            })
        });
        if self.display.fill_contiguous(&area, pixels).is_err() {
            error!("lcd blit failed, frame dropped");
        }
    }
}
