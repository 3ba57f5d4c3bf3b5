//! What the game asks of a screen.
//!
//! Renderers only read game state. The game calls them between fully
//! committed moves, never while the active piece is lifted off the field.

use crate::{
    controller::{
        Motion,
        Piece,
        Span,
    },
    field::Field,
    framebuffer::Framebuffer,
    score::{
        HighscoreTable,
        Ledger,
        NameEntry,
    },
    timing::Blink,
};

pub trait Renderer {
    /// Title screen with the blinking start prompt.
    fn render_start_screen(&mut self, blink: &Blink);

    fn render_highscores(&mut self, table: &HighscoreTable);

    fn render_playing_field(&mut self, field: &Field);

    /// Score, the score to beat and the next-piece preview.
    fn render_scores_and_next_figure(&mut self, ledger: &Ledger, next: &Piece);

    fn render_name_selection(&mut self, entry: &NameEntry, score: u32);

    /// Slide the cells inside `span` one cell towards `motion`.
    ///
    /// Called with the piece still drawn at its old position; the caller
    /// commits the move afterwards. Blocks until the animation is over.
    fn render_animation(&mut self, motion: Motion, span: Span);

    fn render_animation_down(&mut self, span: Span) {
        self.render_animation(Motion::Down, span);
    }

    fn render_animation_left(&mut self, span: Span) {
        self.render_animation(Motion::Left, span);
    }

    fn render_animation_right(&mut self, span: Span) {
        self.render_animation(Motion::Right, span);
    }

    /// Full in-game frame.
    fn render_frame(&mut self, field: &Field, ledger: &Ledger, next: &Piece) {
        self.render_playing_field(field);
        self.render_scores_and_next_figure(ledger, next);
    }
}

/// A physical screen that shows a finished frame.
pub trait Present {
    fn present(&mut self, frame: &Framebuffer);
}

impl<P: Present + ?Sized> Present for &mut P {
    fn present(&mut self, frame: &Framebuffer) {
        (**self).present(frame);
    }
}
