//! # oledtris
//!
//! Falling-block game for a 128×32 monochrome OLED with four push-buttons
//! and a reset switch.
//!
//! The game core is `no_std` and hardware-agnostic:
//! - **Field**: 24×8 occupancy grid, row 0 at the top
//! - **Pieces**: the seven tetrominoes with table-driven rotations
//! - **Game**: title, highscore, play, game-over and name-entry screens
//!   driven by one [`Game::step`] per main-loop iteration
//! - **Rendering**: an `embedded-graphics` [`Painter`] drawing into a
//!   page-organised [`Framebuffer`], and an SPI [`Oled`] driver to show it
//!
//! Hardware comes in through two seams: [`Controls`] for button levels,
//! the timer flag and entropy, and [`Present`] for showing a finished frame.
//!
//! With the `badge` feature the crate also carries the board support for
//! running the game on the Disobey 2026 badge (`src/bin/oledtris.rs`).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let mut painter = oledtris::Painter::new(oled, delay);
//! let mut game = oledtris::Game::new();
//! game.redraw(&mut painter);
//! loop {
//!     game.step(&mut controls, &mut painter);
//! }
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod controller;
pub mod field;
pub mod framebuffer;
pub mod game;
pub mod input;
pub mod oled;
pub mod painter;
pub mod piece;
pub mod render;
pub mod rng;
pub mod rows;
pub mod score;
pub mod timing;

#[cfg(feature = "badge")]
mod backlight;
#[cfg(feature = "badge")]
mod board;
#[cfg(feature = "badge")]
mod buttons;
#[cfg(feature = "badge")]
mod display;

#[cfg(feature = "badge")]
pub use backlight::Backlight;
#[cfg(feature = "badge")]
pub use board::*;
#[cfg(feature = "badge")]
pub use buttons::{
    Buttons,
    SharedInput,
};
pub use controller::{
    Motion,
    Piece,
};
#[cfg(feature = "badge")]
pub use display::{
    Display,
    LcdScreen,
};
pub use field::Field;
pub use framebuffer::Framebuffer;
pub use game::{
    Game,
    Phase,
};
pub use input::{
    Button,
    Controls,
};
pub use oled::{
    Oled,
    OledError,
};
pub use painter::Painter;
pub use piece::Shape;
pub use render::{
    Present,
    Renderer,
};
pub use score::{
    HighscoreTable,
    Ledger,
    Name,
};
