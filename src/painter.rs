//! `embedded-graphics` renderer for the portrait 32×128 layout.
//!
//! The top 32 pixel rows hold the HUD, the 24×8 field fills the rest with
//! 4×4 pixel cells.

use embedded_graphics::{
    Drawable,
    mono_font::{
        MonoTextStyle,
        ascii::FONT_4X6,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{
        Line,
        PrimitiveStyle,
        Rectangle,
    },
    text::{
        Baseline,
        Text,
    },
};
use embedded_hal::delay::DelayNs;

use crate::{
    controller::{
        Motion,
        Piece,
        Span,
    },
    field::{
        COLS,
        Field,
        ROWS,
    },
    framebuffer::{
        Framebuffer,
        PORTRAIT_HEIGHT,
        PORTRAIT_WIDTH,
    },
    render::{
        Present,
        Renderer,
    },
    score::{
        HighscoreTable,
        Ledger,
        NAME_LEN,
        NameEntry,
    },
    timing::Blink,
};

// ── Layout ──────────────────────────────────────────────────────────────────
const CELL: i32 = 4;
const FIELD_Y: i32 = 32;
const HUD_H: u32 = FIELD_Y as u32;

const PREVIEW_CELL: i32 = 3;
const PREVIEW_Y: i32 = 2;
const HIGH_Y: i32 = 11;
const SCORE_Y: i32 = 20;

const GLYPH_W: i32 = 4;
const SCORE_DIGITS: usize = 6;

const TITLE_Y: i32 = 20;
const PROMPT_Y: i32 = 60;

const TABLE_TOP: i32 = 14;
const TABLE_PITCH: i32 = 22;

const LETTER_PITCH: i32 = 7;
const LETTERS_X: i32 = 3;
const LETTERS_Y: i32 = 56;
const NAME_SCORE_Y: i32 = 80;

/// Frames per one-cell slide; each moves the cells by one pixel.
pub const ANIMATION_FRAMES: u32 = CELL as u32;
/// Pause after each animation frame.
pub const FRAME_DELAY_MS: u32 = 15;

/// Draws game screens into a [`Framebuffer`] and hands each finished screen
/// to `S`.
pub struct Painter<S, W> {
    frame: Framebuffer,
    screen: S,
    delay: W,
}

impl<S: Present, W: DelayNs> Painter<S, W> {
    pub fn new(screen: S, delay: W) -> Self {
        Self {
            frame: Framebuffer::new(),
            screen,
            delay,
        }
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    fn present(&mut self) {
        self.screen.present(&self.frame);
    }

    fn paint(&mut self, item: &impl Drawable<Color = BinaryColor>) {
        let Ok(_) = item.draw(&mut self.frame);
    }

    fn fill(&mut self, area: Rectangle, color: BinaryColor) {
        self.paint(&area.into_styled(PrimitiveStyle::with_fill(color)));
    }

    fn text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
        self.paint(&Text::with_baseline(text, Point::new(x, y), style, Baseline::Top));
    }

    /// Text horizontally centred on the portrait surface.
    fn centred(&mut self, text: &str, y: i32) {
        let x = (PORTRAIT_WIDTH as i32 - text.len() as i32 * GLYPH_W) / 2;
        self.text(text, x, y);
    }

    fn number(&mut self, value: u32, x: i32, y: i32) {
        let digits = six_digits(value);
        self.text(core::str::from_utf8(&digits).unwrap_or_default(), x, y);
    }

    fn field_area() -> Rectangle {
        Rectangle::new(
            Point::new(0, FIELD_Y),
            Size::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT - HUD_H),
        )
    }

    fn hud_area() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(PORTRAIT_WIDTH, HUD_H))
    }

    fn whole_screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT))
    }

    /// Pixel rectangle covered by `span`, grown by one cell towards `motion`.
    fn sweep(motion: Motion, span: Span) -> (i32, i32, i32, i32) {
        let (mut left, mut right) = (span.left, span.right);
        let mut bottom = span.bottom;
        match motion {
            Motion::Down => bottom = (bottom + 1).min(ROWS),
            Motion::Left => left = left.saturating_sub(1),
            Motion::Right => right = (right + 1).min(COLS),
        }
        (
            left as i32 * CELL,
            right as i32 * CELL,
            FIELD_Y + span.top as i32 * CELL,
            FIELD_Y + bottom as i32 * CELL,
        )
    }

    /// Shift the pixels of the sweep rectangle one pixel towards `motion`.
    fn slide(&mut self, motion: Motion, (x0, x1, y0, y1): (i32, i32, i32, i32)) {
        let (x0, x1, y0, y1) = (x0 as u32, x1 as u32, y0 as u32, y1 as u32);
        match motion {
            Motion::Down => {
                for y in (y0 + 1..y1).rev() {
                    for x in x0..x1 {
                        let above = self.frame.portrait_pixel(x, y - 1);
                        self.frame.set_portrait_pixel(x, y, above);
                    }
                }
                for x in x0..x1 {
                    self.frame.set_portrait_pixel(x, y0, false);
                }
            }
            Motion::Left => {
                for x in x0..x1.saturating_sub(1) {
                    for y in y0..y1 {
                        let beside = self.frame.portrait_pixel(x + 1, y);
                        self.frame.set_portrait_pixel(x, y, beside);
                    }
                }
                for y in y0..y1 {
                    self.frame.set_portrait_pixel(x1 - 1, y, false);
                }
            }
            Motion::Right => {
                for x in (x0 + 1..x1).rev() {
                    for y in y0..y1 {
                        let beside = self.frame.portrait_pixel(x - 1, y);
                        self.frame.set_portrait_pixel(x, y, beside);
                    }
                }
                for y in y0..y1 {
                    self.frame.set_portrait_pixel(x0, y, false);
                }
            }
        }
    }
}

impl<S: Present, W: DelayNs> Renderer for Painter<S, W> {
    fn render_start_screen(&mut self, blink: &Blink) {
        self.fill(Self::whole_screen(), BinaryColor::Off);
        self.paint(&Self::whole_screen().into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)));
        self.centred("TETRIS", TITLE_Y);
        if !blink.is_hidden() {
            self.centred("PRESS", PROMPT_Y);
            self.centred("PLAY", PROMPT_Y + 8);
        }
        self.present();
    }

    fn render_highscores(&mut self, table: &HighscoreTable) {
        self.fill(Self::whole_screen(), BinaryColor::Off);
        self.centred("HIGH", 2);
        self.paint(
            &Line::new(Point::new(0, 9), Point::new(PORTRAIT_WIDTH as i32 - 1, 9))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)),
        );
        for (i, entry) in table.entries().iter().enumerate() {
            let y = TABLE_TOP + i as i32 * TABLE_PITCH;
            let name = entry.name.to_ascii();
            self.centred(core::str::from_utf8(&name).unwrap_or_default(), y);
            self.number(entry.score, 4, y + 7);
        }
        self.present();
    }

    fn render_playing_field(&mut self, field: &Field) {
        self.fill(Self::field_area(), BinaryColor::Off);
        for (r, row) in field.rows().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                if occupied {
                    self.fill(
                        Rectangle::new(
                            Point::new(c as i32 * CELL, FIELD_Y + r as i32 * CELL),
                            Size::new(CELL as u32, CELL as u32),
                        ),
                        BinaryColor::On,
                    );
                }
            }
        }
        self.present();
    }

    fn render_scores_and_next_figure(&mut self, ledger: &Ledger, next: &Piece) {
        self.fill(Self::hud_area(), BinaryColor::Off);

        let pattern = next.shape().pattern(0);
        let x0 = (PORTRAIT_WIDTH as i32 - pattern.width() as i32 * PREVIEW_CELL) / 2;
        for (r, c) in pattern.cells() {
            self.fill(
                Rectangle::new(
                    Point::new(x0 + c as i32 * PREVIEW_CELL, PREVIEW_Y + r as i32 * PREVIEW_CELL),
                    Size::new(PREVIEW_CELL as u32, PREVIEW_CELL as u32),
                ),
                BinaryColor::On,
            );
        }

        self.number(ledger.high_score(), 4, HIGH_Y);
        self.number(ledger.score(), 4, SCORE_Y);
        self.paint(
            &Line::new(Point::new(0, FIELD_Y - 2), Point::new(PORTRAIT_WIDTH as i32 - 1, FIELD_Y - 2))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)),
        );
        self.present();
    }

    fn render_name_selection(&mut self, entry: &NameEntry, score: u32) {
        self.fill(Self::whole_screen(), BinaryColor::Off);
        self.centred("NAME", TITLE_Y);

        let name = entry.name().to_ascii();
        for i in 0..NAME_LEN {
            let x = LETTERS_X + i as i32 * LETTER_PITCH;
            self.text(core::str::from_utf8(&name[i..=i]).unwrap_or_default(), x, LETTERS_Y);
        }
        let cursor_x = LETTERS_X + entry.cursor() as i32 * LETTER_PITCH;
        self.paint(
            &Line::new(Point::new(cursor_x, LETTERS_Y + 7), Point::new(cursor_x + GLYPH_W - 1, LETTERS_Y + 7))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)),
        );

        self.number(score, 4, NAME_SCORE_Y);
        self.present();
    }

    fn render_animation(&mut self, motion: Motion, span: Span) {
        let sweep = Self::sweep(motion, span);
        for _ in 0..ANIMATION_FRAMES {
            self.slide(motion, sweep);
            self.present();
            self.delay.delay_ms(FRAME_DELAY_MS);
        }
    }
}

/// Zero-padded decimal, the last six digits of `value`.
fn six_digits(mut value: u32) -> [u8; SCORE_DIGITS] {
    let mut digits = [b'0'; SCORE_DIGITS];
    for d in digits.iter_mut().rev() {
        *d = b'0' + (value % 10) as u8;
        value /= 10;
    }
    digits
}
