//! Driver for the 128×32 SSD1306 OLED on a 4-wire SPI bus.
//!
//! The panel has separate logic (VDD) and panel (VBAT) supply switches, both
//! active low, next to the data/command select and reset lines.

use embedded_hal::{
    delay::DelayNs,
    digital::OutputPin,
    spi::SpiBus,
};

use crate::{
    framebuffer::{
        Framebuffer,
        PAGES,
    },
    render::Present,
};

const DISPLAY_OFF: u8 = 0xAE;
const DISPLAY_ON: u8 = 0xAF;
const CHARGE_PUMP: u8 = 0x8D;
const CHARGE_PUMP_ON: u8 = 0x14;
const PRE_CHARGE: u8 = 0xD9;
const PRE_CHARGE_PERIOD: u8 = 0xF1;
const SEGMENT_REMAP: u8 = 0xA1;
const COM_SCAN_REVERSED: u8 = 0xC8;
const COM_PINS: u8 = 0xDA;
const COM_PINS_SEQUENTIAL: u8 = 0x20;
const PAGE_ADDRESS: u8 = 0x22;
const COLUMN_LOW: u8 = 0x00;
const COLUMN_HIGH: u8 = 0x10;

const MODE_SWITCH_US: u32 = 10;
const RESET_PULSE_US: u32 = 10;
const VDD_SETTLE_MS: u32 = 1;
const VBAT_SETTLE_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OledError<S, P> {
    /// SPI transfer failed.
    Spi(S),
    /// A control line could not be driven.
    Pin(P),
}

pub struct Oled<SPI, DC, RST, VDD, VBAT> {
    spi: SPI,
    dc: DC,
    reset: RST,
    vdd: VDD,
    vbat: VBAT,
}

type OledResult<T, SPI, DC> =
    Result<T, OledError<<SPI as embedded_hal::spi::ErrorType>::Error, <DC as embedded_hal::digital::ErrorType>::Error>>;

impl<SPI, DC, RST, VDD, VBAT> Oled<SPI, DC, RST, VDD, VBAT>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    VDD: OutputPin<Error = DC::Error>,
    VBAT: OutputPin<Error = DC::Error>,
{
    pub fn new(spi: SPI, dc: DC, reset: RST, vdd: VDD, vbat: VBAT) -> Self {
        Self {
            spi,
            dc,
            reset,
            vdd,
            vbat,
        }
    }

    pub fn release(self) -> (SPI, DC, RST, VDD, VBAT) {
        (self.spi, self.dc, self.reset, self.vdd, self.vbat)
    }

    /// Power the panel up and configure it. Must run once before the first
    /// [`Oled::flush`].
    pub fn display_init(&mut self, delay: &mut impl DelayNs) -> OledResult<(), SPI, DC> {
        self.dc.set_low().map_err(OledError::Pin)?;
        delay.delay_us(MODE_SWITCH_US);
        self.vdd.set_low().map_err(OledError::Pin)?;
        delay.delay_ms(VDD_SETTLE_MS);

        self.byte_transfer(DISPLAY_OFF)?;
        self.reset.set_low().map_err(OledError::Pin)?;
        delay.delay_us(RESET_PULSE_US);
        self.reset.set_high().map_err(OledError::Pin)?;
        delay.delay_us(RESET_PULSE_US);

        self.command(&[CHARGE_PUMP, CHARGE_PUMP_ON, PRE_CHARGE, PRE_CHARGE_PERIOD])?;

        self.vbat.set_low().map_err(OledError::Pin)?;
        delay.delay_ms(VBAT_SETTLE_MS);

        self.command(&[SEGMENT_REMAP, COM_SCAN_REVERSED, COM_PINS, COM_PINS_SEQUENTIAL, DISPLAY_ON])?;
        info!("oled initialised");
        Ok(())
    }

    /// Exchange one byte on the bus and return the byte clocked in.
    pub fn byte_transfer(&mut self, value: u8) -> OledResult<u8, SPI, DC> {
        let mut word = [value];
        self.spi.transfer_in_place(&mut word).map_err(OledError::Spi)?;
        self.spi.flush().map_err(OledError::Spi)?;
        Ok(word[0])
    }

    fn command(&mut self, bytes: &[u8]) -> OledResult<(), SPI, DC> {
        self.dc.set_low().map_err(OledError::Pin)?;
        for &b in bytes {
            self.byte_transfer(b)?;
        }
        Ok(())
    }

    /// Send the whole frame, page by page from column 0.
    pub fn flush(&mut self, frame: &Framebuffer) -> OledResult<(), SPI, DC> {
        for page in 0..PAGES {
            self.command(&[PAGE_ADDRESS, page as u8, COLUMN_LOW, COLUMN_HIGH])?;
            self.dc.set_high().map_err(OledError::Pin)?;
            self.spi.write(frame.page(page)).map_err(OledError::Spi)?;
            self.spi.flush().map_err(OledError::Spi)?;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, VDD, VBAT> Present for Oled<SPI, DC, RST, VDD, VBAT>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    VDD: OutputPin<Error = DC::Error>,
    VBAT: OutputPin<Error = DC::Error>,
{
    fn present(&mut self, frame: &Framebuffer) {
        if self.flush(frame).is_err() {
            error!("oled flush failed, frame dropped");
        }
    }
}
