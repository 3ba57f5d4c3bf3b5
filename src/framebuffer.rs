//! Monochrome 128×32 frame in the OLED controller's page layout.
//!
//! Memory is four pages of 128 column bytes; bit `n` of a byte is pixel row
//! `8 * page + n`. The game draws in portrait orientation (the panel is held
//! upright), so `embedded-graphics` sees a 32×128 surface whose `y` axis
//! runs against the panel's columns.

use core::convert::Infallible;

use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{
        DrawTarget,
        OriginDimensions,
        Size,
    },
};

/// Panel columns.
pub const COLUMNS: usize = 128;
/// Pixel rows per page.
pub const PAGE_HEIGHT: usize = 8;
/// Pages on the panel.
pub const PAGES: usize = 4;
/// Panel pixel rows.
pub const ROWS: usize = PAGES * PAGE_HEIGHT;

/// Width of the portrait drawing surface.
pub const PORTRAIT_WIDTH: u32 = ROWS as u32;
/// Height of the portrait drawing surface.
pub const PORTRAIT_HEIGHT: u32 = COLUMNS as u32;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Framebuffer {
    pages: [[u8; COLUMNS]; PAGES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self {
            pages: [[0; COLUMNS]; PAGES],
        }
    }

    pub fn clear_all(&mut self) {
        self.pages = [[0; COLUMNS]; PAGES];
    }

    /// Column bytes of one page, as sent to the controller.
    pub fn page(&self, page: usize) -> &[u8; COLUMNS] {
        &self.pages[page]
    }

    /// Pixel in panel coordinates (`column` 0..128, `row` 0..32).
    pub fn pixel(&self, column: usize, row: usize) -> bool {
        if column >= COLUMNS || row >= ROWS {
            return false;
        }
        self.pages[row / PAGE_HEIGHT][column] & (1 << (row % PAGE_HEIGHT)) != 0
    }

    pub fn set_pixel(&mut self, column: usize, row: usize, on: bool) {
        if column >= COLUMNS || row >= ROWS {
            return;
        }
        let byte = &mut self.pages[row / PAGE_HEIGHT][column];
        let mask = 1 << (row % PAGE_HEIGHT);
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Pixel in portrait coordinates, as drawn through `embedded-graphics`.
    pub fn portrait_pixel(&self, x: u32, y: u32) -> bool {
        match Self::to_panel(x as i32, y as i32) {
            Some((column, row)) => self.pixel(column, row),
            None => false,
        }
    }

    pub fn set_portrait_pixel(&mut self, x: u32, y: u32, on: bool) {
        if let Some((column, row)) = Self::to_panel(x as i32, y as i32) {
            self.set_pixel(column, row, on);
        }
    }

    fn to_panel(x: i32, y: i32) -> Option<(usize, usize)> {
        let inside = (0..PORTRAIT_WIDTH as i32).contains(&x) && (0..PORTRAIT_HEIGHT as i32).contains(&y);
        inside.then(|| (COLUMNS - 1 - y as usize, x as usize))
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((column, row)) = Self::to_panel(point.x, point.y) {
                self.set_pixel(column, row, color.is_on());
            }
        }
        Ok(())
    }
}
