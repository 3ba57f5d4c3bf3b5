//! Game state machine and tick scheduler.
//!
//! [`Game::step`] is one iteration of the main loop: sample the buttons,
//! consume the timer flag and advance whichever screen is active. It never
//! waits on its own; blocking only happens inside the renderer's animations.

use crate::{
    controller::{
        Motion,
        Piece,
    },
    field::Field,
    input::{
        Button,
        ButtonLatches,
        Controls,
    },
    piece::Shape,
    render::Renderer,
    rng::{
        self,
        Entropy,
    },
    rows,
    score::{
        HighscoreTable,
        LOCK_BONUS,
        Ledger,
        NameEntry,
        ROW_BONUS,
    },
    timing::{
        Blink,
        FallTimer,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Title screen. `Right` starts, `Rotate` shows the highscores.
    Start,
    /// Highscore list. `Rotate` or `Right` returns to the title.
    Highscores,
    Playing,
    /// Last frame stays up until `Right` is pressed.
    GameOver,
    /// Tagging a new highscore.
    NameEntry(NameEntry),
}

pub struct Game {
    field: Field,
    current: Piece,
    next: Piece,
    ledger: Ledger,
    table: HighscoreTable,
    fall: FallTimer,
    blink: Blink,
    buttons: ButtonLatches,
    phase: Phase,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_table(HighscoreTable::default())
    }

    /// A game on the title screen with a pre-filled highscore table.
    pub fn with_table(table: HighscoreTable) -> Self {
        Self {
            field: Field::new(),
            current: Piece::spawn(Shape::I),
            next: Piece::spawn(Shape::O),
            ledger: Ledger::start(&table),
            table,
            fall: FallTimer::default(),
            blink: Blink::default(),
            buttons: ButtonLatches::default(),
            phase: Phase::Start,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn table(&self) -> &HighscoreTable {
        &self.table
    }

    pub fn fall_timer(&self) -> &FallTimer {
        &self.fall
    }

    /// Draw the screen of the current phase from scratch.
    pub fn redraw(&self, renderer: &mut impl Renderer) {
        match self.phase {
            Phase::Start => renderer.render_start_screen(&self.blink),
            Phase::Highscores => renderer.render_highscores(&self.table),
            Phase::Playing | Phase::GameOver => renderer.render_frame(&self.field, &self.ledger, &self.next),
            Phase::NameEntry(entry) => renderer.render_name_selection(&entry, self.ledger.score()),
        }
    }

    /// Run one main-loop iteration.
    pub fn step(&mut self, controls: &mut impl Controls, renderer: &mut impl Renderer) {
        self.buttons.update(&*controls);
        let timer = controls.take_timer_flag();

        if controls.reset_switch() && self.phase != Phase::Start {
            info!("reset switch: session abandoned");
            self.enter(Phase::Start, renderer);
            return;
        }

        match self.phase {
            Phase::Start => self.start_screen(&*controls, timer, renderer),
            Phase::Highscores => {
                if self.buttons.pressed(Button::Rotate) || self.buttons.pressed(Button::Right) {
                    self.enter(Phase::Start, renderer);
                }
            }
            Phase::Playing => self.play(&*controls, timer, renderer),
            Phase::GameOver => {
                if self.buttons.pressed(Button::Right) {
                    let phase = if self.ledger.qualifies() {
                        Phase::NameEntry(NameEntry::default())
                    } else {
                        Phase::Highscores
                    };
                    self.enter(phase, renderer);
                }
            }
            Phase::NameEntry(entry) => self.name_entry(entry, renderer),
        }
    }

    fn enter(&mut self, phase: Phase, renderer: &mut impl Renderer) {
        info!("phase {} -> {}", self.phase, phase);
        if phase == Phase::Start {
            self.blink = Blink::default();
        }
        self.phase = phase;
        self.redraw(renderer);
    }

    fn start_screen(&mut self, controls: &impl Controls, timer: bool, renderer: &mut impl Renderer) {
        if self.buttons.pressed(Button::Right) {
            self.start_session(controls, renderer);
        } else if self.buttons.pressed(Button::Rotate) {
            self.enter(Phase::Highscores, renderer);
        } else if timer {
            self.blink.tick();
            renderer.render_start_screen(&self.blink);
        }
    }

    fn start_session(&mut self, controls: &impl Controls, renderer: &mut impl Renderer) {
        self.field.clear();
        self.ledger = Ledger::start(&self.table);
        self.fall = FallTimer::default();

        let entropy = self.entropy(controls);
        let current = rng::next_shape(self.current.shape(), entropy);
        self.current = Piece::spawn(current);
        self.next = Piece::spawn(rng::next_shape(current, entropy));
        self.current.place(&mut self.field);

        self.enter(Phase::Playing, renderer);
    }

    fn entropy(&self, controls: &impl Controls) -> Entropy {
        Entropy {
            counter: controls.free_running(),
            ticks: u32::from(self.fall.ticks()),
            score: self.ledger.score(),
        }
    }

    fn play(&mut self, controls: &impl Controls, timer: bool, renderer: &mut impl Renderer) {
        let mut moved = false;
        if self.buttons.held(Button::Drop) {
            moved |= self.try_move(Motion::Down, renderer);
        }
        if self.buttons.pressed(Button::Rotate) {
            moved |= self.try_rotate();
        }
        if self.buttons.pressed(Button::Left) {
            moved |= self.try_move(Motion::Left, renderer);
        }
        if self.buttons.pressed(Button::Right) {
            moved |= self.try_move(Motion::Right, renderer);
        }
        if moved {
            renderer.render_frame(&self.field, &self.ledger, &self.next);
        }

        if timer && self.fall.tick() {
            if !self.try_move(Motion::Down, renderer) {
                self.lock(controls, renderer);
            }
            self.fall.fell();
            if self.phase == Phase::Playing {
                renderer.render_frame(&self.field, &self.ledger, &self.next);
            }
        }
    }

    /// Erase, check, and either restore or animate and commit a one-cell
    /// move. Returns whether the piece moved.
    fn try_move(&mut self, motion: Motion, renderer: &mut impl Renderer) -> bool {
        self.current.erase(&mut self.field);
        let free = self.current.can_shift(&self.field, motion);
        self.current.place(&mut self.field);
        if !free {
            return false;
        }

        renderer.render_animation(motion, self.current.span());
        self.current.erase(&mut self.field);
        self.current.shift(motion);
        self.current.place(&mut self.field);
        true
    }

    fn try_rotate(&mut self) -> bool {
        self.current.erase(&mut self.field);
        let rotated = self.current.try_rotate(&self.field);
        self.current.place(&mut self.field);
        rotated
    }

    /// Settle the active piece, score it, clear rows and bring in the next
    /// piece, or end the session when there is no room for it.
    fn lock(&mut self, controls: &impl Controls, renderer: &mut impl Renderer) {
        self.ledger.add(LOCK_BONUS);
        let full = rows::scan_full_rows(&self.field);
        let cleared = rows::compact(&mut self.field, &full);
        self.ledger.add(ROW_BONUS * cleared as u32);
        self.ledger.beat_check(&self.table);
        debug!("locked {}: {} rows, score {}", self.current.shape(), cleared, self.ledger.score());

        self.current = Piece::spawn(self.next.shape());
        if self.current.overlaps(&self.field) {
            self.enter(Phase::GameOver, renderer);
            return;
        }
        self.next = Piece::spawn(rng::next_shape(self.current.shape(), self.entropy(controls)));
        self.current.place(&mut self.field);
    }

    fn name_entry(&mut self, mut entry: NameEntry, renderer: &mut impl Renderer) {
        if self.buttons.pressed(Button::Drop) {
            self.table.commit(entry.name(), self.ledger.score(), self.ledger.target());
            self.enter(Phase::Highscores, renderer);
            return;
        }

        let before = entry;
        if self.buttons.pressed(Button::Rotate) {
            entry.previous_letter();
        }
        if self.buttons.pressed(Button::Left) {
            entry.next_letter();
        }
        if self.buttons.pressed(Button::Right) {
            entry.advance();
        }
        if entry != before {
            self.phase = Phase::NameEntry(entry);
            renderer.render_name_selection(&entry, self.ledger.score());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::Span,
        field::ROWS,
        score::{
            Entry,
            Name,
            TABLE_LEN,
        },
        timing::INITIAL_TIMEOUT,
    };

    #[derive(Default)]
    struct Pad {
        drop: bool,
        rotate: bool,
        left: bool,
        right: bool,
        switch: bool,
        timer: bool,
        counter: u32,
    }

    impl Controls for Pad {
        fn is_pressed(&self, button: Button) -> bool {
            match button {
                Button::Drop => self.drop,
                Button::Rotate => self.rotate,
                Button::Left => self.left,
                Button::Right => self.right,
            }
        }

        fn reset_switch(&self) -> bool {
            self.switch
        }

        fn take_timer_flag(&mut self) -> bool {
            core::mem::take(&mut self.timer)
        }

        fn free_running(&self) -> u32 {
            self.counter
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Call {
        Start { hidden: bool },
        Highscores,
        Field,
        Hud,
        Name { cursor: usize },
        Animation(Motion),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn animations(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Animation(_))).count()
        }

        fn last(&self) -> Option<Call> {
            self.calls.last().copied()
        }
    }

    impl Renderer for Recorder {
        fn render_start_screen(&mut self, blink: &Blink) {
            self.calls.push(Call::Start {
                hidden: blink.is_hidden(),
            });
        }

        fn render_highscores(&mut self, _: &HighscoreTable) {
            self.calls.push(Call::Highscores);
        }

        fn render_playing_field(&mut self, _: &Field) {
            self.calls.push(Call::Field);
        }

        fn render_scores_and_next_figure(&mut self, _: &Ledger, _: &Piece) {
            self.calls.push(Call::Hud);
        }

        fn render_name_selection(&mut self, entry: &NameEntry, _: u32) {
            self.calls.push(Call::Name {
                cursor: entry.cursor(),
            });
        }

        fn render_animation(&mut self, motion: Motion, _: Span) {
            self.calls.push(Call::Animation(motion));
        }
    }

    /// Press and release `set` over two steps.
    fn tap(game: &mut Game, pad: &mut Pad, rec: &mut Recorder, set: fn(&mut Pad, bool)) {
        set(pad, true);
        game.step(pad, rec);
        set(pad, false);
        game.step(pad, rec);
    }

    fn right(pad: &mut Pad, level: bool) {
        pad.right = level;
    }

    fn rotate(pad: &mut Pad, level: bool) {
        pad.rotate = level;
    }

    fn left(pad: &mut Pad, level: bool) {
        pad.left = level;
    }

    fn drop_key(pad: &mut Pad, level: bool) {
        pad.drop = level;
    }

    fn tick(game: &mut Game, pad: &mut Pad, rec: &mut Recorder) {
        pad.timer = true;
        game.step(pad, rec);
    }

    fn started() -> (Game, Pad, Recorder) {
        let mut game = Game::new();
        let mut pad = Pad::default();
        let mut rec = Recorder::default();
        tap(&mut game, &mut pad, &mut rec, right);
        assert_eq!(game.phase(), Phase::Playing);
        (game, pad, rec)
    }

    /// Swap the active and next pieces for known shapes.
    fn set_pieces(game: &mut Game, current: Piece, next: Shape) {
        game.current.erase(&mut game.field);
        game.current = current;
        game.current.place(&mut game.field);
        game.next = Piece::spawn(next);
    }

    fn table(scores: [u32; TABLE_LEN]) -> HighscoreTable {
        HighscoreTable::new(scores.map(|score| Entry {
            name: Name::repeated(1),
            score,
        }))
    }

    #[test]
    fn right_starts_a_session() {
        let (game, _, rec) = started();
        assert_eq!(game.field().count(), 4);
        assert_ne!(game.current().shape(), game.next().shape());
        assert_eq!(game.current().origin(), Piece::spawn(Shape::I).origin());
        assert_eq!(game.ledger().score(), 0);
        assert_eq!(game.ledger().target(), Some(4));
        assert_eq!(game.fall_timer().timeout(), INITIAL_TIMEOUT);
        assert_eq!(&rec.calls[rec.calls.len() - 2..], &[Call::Field, Call::Hud]);
    }

    #[test]
    fn rotate_toggles_the_highscore_list() {
        let mut game = Game::new();
        let mut pad = Pad::default();
        let mut rec = Recorder::default();

        tap(&mut game, &mut pad, &mut rec, rotate);
        assert_eq!(game.phase(), Phase::Highscores);
        assert_eq!(rec.last(), Some(Call::Highscores));

        tap(&mut game, &mut pad, &mut rec, rotate);
        assert_eq!(game.phase(), Phase::Start);
        assert_eq!(rec.last(), Some(Call::Start { hidden: false }));
    }

    #[test]
    fn start_prompt_blinks_on_timer_ticks() {
        let mut game = Game::new();
        let mut pad = Pad::default();
        let mut rec = Recorder::default();

        game.step(&mut pad, &mut rec);
        assert!(rec.calls.is_empty());

        for _ in 0..crate::timing::BLINK_PERIOD {
            tick(&mut game, &mut pad, &mut rec);
        }
        assert_eq!(rec.calls.len(), usize::from(crate::timing::BLINK_PERIOD));
        assert_eq!(rec.last(), Some(Call::Start { hidden: true }));
    }

    #[test]
    fn piece_falls_once_per_timeout() {
        let (mut game, mut pad, mut rec) = started();
        let row = game.current().origin().row;

        for _ in 0..INITIAL_TIMEOUT - 1 {
            tick(&mut game, &mut pad, &mut rec);
        }
        assert_eq!(game.current().origin().row, row);
        assert_eq!(rec.animations(), 0);

        tick(&mut game, &mut pad, &mut rec);
        assert_eq!(game.current().origin().row, row + 1);
        assert_eq!(rec.animations(), 1);
        assert_eq!(game.fall_timer().ticks(), 0);
        assert_eq!(game.field().count(), 4);
    }

    #[test]
    fn soft_drop_moves_every_poll_while_held() {
        let (mut game, mut pad, mut rec) = started();
        let floor = ROWS - game.current().height();

        pad.drop = true;
        for _ in 0..floor + 3 {
            game.step(&mut pad, &mut rec);
        }
        assert_eq!(game.current().origin().row, floor);
        assert_eq!(rec.animations(), floor);
        assert_eq!(game.ledger().score(), 0);

        pad.drop = false;
        for _ in 0..INITIAL_TIMEOUT {
            tick(&mut game, &mut pad, &mut rec);
        }
        assert_eq!(game.ledger().score(), LOCK_BONUS);
        assert_eq!(game.current().origin().row, 0);
        assert_eq!(game.field().count(), 8);
    }

    #[test]
    fn sideways_moves_are_edge_triggered() {
        let (mut game, mut pad, mut rec) = started();
        let col = game.current().origin().col;

        pad.left = true;
        for _ in 0..3 {
            game.step(&mut pad, &mut rec);
        }
        assert_eq!(game.current().origin().col, col - 1);
        pad.left = false;
        game.step(&mut pad, &mut rec);

        tap(&mut game, &mut pad, &mut rec, left);
        assert_eq!(game.current().origin().col, col - 2);
        tap(&mut game, &mut pad, &mut rec, right);
        assert_eq!(game.current().origin().col, col - 1);
        assert_eq!(rec.calls.iter().filter(|c| **c == Call::Animation(Motion::Right)).count(), 1);
        assert_eq!(rec.calls.iter().filter(|c| **c == Call::Animation(Motion::Left)).count(), 2);
    }

    #[test]
    fn rotate_in_play_turns_the_piece() {
        let (mut game, mut pad, mut rec) = started();
        set_pieces(&mut game, Piece::spawn(Shape::T), Shape::O);
        tap(&mut game, &mut pad, &mut rec, rotate);
        assert_eq!(game.current().rotation(), 1);
        assert_eq!(game.field().count(), 4);
        assert_eq!(rec.last(), Some(Call::Hud));
    }

    #[test]
    fn lock_scores_and_promotes_the_next_piece() {
        let (mut game, pad, mut rec) = started();
        set_pieces(&mut game, Piece::at(Shape::I, 0, ROWS - 1, 0), Shape::O);

        game.lock(&pad, &mut rec);

        assert_eq!(game.ledger().score(), LOCK_BONUS);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.current().shape(), Shape::O);
        assert_eq!(game.current().origin(), Piece::spawn(Shape::O).origin());
        assert_ne!(game.next().shape(), Shape::O);
        // A lone I cannot fill a row; it stays where it locked.
        assert_eq!(game.field().count(), 8);
        assert!(game.field().get(ROWS - 1, 0) && game.field().get(ROWS - 1, 3));
        assert!(game.field().get(0, 2) && game.field().get(1, 3));
    }

    #[test]
    fn lock_at_the_spawn_point_ends_the_session() {
        let (mut game, pad, mut rec) = started();
        set_pieces(&mut game, Piece::spawn(Shape::I), Shape::O);

        game.lock(&pad, &mut rec);

        assert_eq!(game.ledger().score(), LOCK_BONUS);
        assert_eq!(game.current().shape(), Shape::O);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.field().count(), 4);
    }

    #[test]
    fn lock_clears_full_rows() {
        let (mut game, pad, mut rec) = started();
        let resting = Piece::at(Shape::O, 0, ROWS - 2, 0);
        set_pieces(&mut game, resting, Shape::T);
        for row in ROWS - 2..ROWS {
            for col in 2..8 {
                game.field.set(row, col, true);
            }
        }

        game.lock(&pad, &mut rec);

        assert_eq!(game.ledger().score(), LOCK_BONUS + 2 * ROW_BONUS);
        assert_eq!(game.field().count(), 4);
        assert_eq!(game.current().shape(), Shape::T);
    }

    #[test]
    fn blocked_spawn_ends_the_session() {
        let (mut game, mut pad, mut rec) = started();
        let resting = Piece::at(Shape::O, 0, ROWS - 2, 0);
        set_pieces(&mut game, resting, Shape::O);
        game.field.set(1, 3, true);

        game.lock(&pad, &mut rec);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(&rec.calls[rec.calls.len() - 2..], &[Call::Field, Call::Hud]);

        // Nothing but Right leaves the game-over screen.
        for _ in 0..20 {
            tick(&mut game, &mut pad, &mut rec);
        }
        tap(&mut game, &mut pad, &mut rec, left);
        assert_eq!(game.phase(), Phase::GameOver);

        // 5 points beat the all-zero default table.
        tap(&mut game, &mut pad, &mut rec, right);
        assert_eq!(game.phase(), Phase::NameEntry(NameEntry::default()));
        assert_eq!(rec.last(), Some(Call::Name { cursor: 0 }));
    }

    #[test]
    fn name_entry_commits_the_tag() {
        let mut game = Game::with_table(table([500, 400, 300, 200, 100]));
        let mut pad = Pad::default();
        let mut rec = Recorder::default();
        tap(&mut game, &mut pad, &mut rec, right);
        game.ledger.add(345);
        let resting = Piece::at(Shape::O, 0, ROWS - 2, 0);
        set_pieces(&mut game, resting, Shape::O);
        game.field.set(0, 2, true);
        game.lock(&pad, &mut rec);
        assert_eq!(game.ledger().target(), Some(1));
        tap(&mut game, &mut pad, &mut rec, right);

        tap(&mut game, &mut pad, &mut rec, rotate); // Z
        tap(&mut game, &mut pad, &mut rec, right);
        tap(&mut game, &mut pad, &mut rec, left); // B
        tap(&mut game, &mut pad, &mut rec, left); // C
        assert_eq!(rec.last(), Some(Call::Name { cursor: 1 }));
        tap(&mut game, &mut pad, &mut rec, drop_key);

        assert_eq!(game.phase(), Phase::Highscores);
        let entry = game.table().entries()[2];
        assert_eq!(entry.score, 350);
        assert_eq!(&entry.name.to_ascii(), b"ZCAA");
        assert_eq!(game.table().entries().map(|e| e.score), [500, 400, 350, 300, 200]);

        tap(&mut game, &mut pad, &mut rec, right);
        assert_eq!(game.phase(), Phase::Start);
    }

    #[test]
    fn unqualified_session_shows_the_list() {
        let mut game = Game::with_table(table([900; TABLE_LEN]));
        let mut pad = Pad::default();
        let mut rec = Recorder::default();
        tap(&mut game, &mut pad, &mut rec, right);
        let resting = Piece::at(Shape::O, 0, ROWS - 2, 0);
        set_pieces(&mut game, resting, Shape::I);
        game.field.set(0, 3, true);
        game.lock(&pad, &mut rec);
        assert_eq!(game.phase(), Phase::GameOver);

        tap(&mut game, &mut pad, &mut rec, right);
        assert_eq!(game.phase(), Phase::Highscores);
        assert_eq!(game.table().entries().map(|e| e.score), [900; TABLE_LEN]);
    }

    #[test]
    fn reset_switch_abandons_the_session() {
        let (mut game, mut pad, mut rec) = started();
        pad.switch = true;
        game.step(&mut pad, &mut rec);
        assert_eq!(game.phase(), Phase::Start);
        assert_eq!(rec.last(), Some(Call::Start { hidden: false }));

        // Stays on the title while switched on, and the title still blinks.
        let calls = rec.calls.len();
        tick(&mut game, &mut pad, &mut rec);
        assert_eq!(game.phase(), Phase::Start);
        assert_eq!(rec.calls.len(), calls + 1);
    }

    #[test]
    fn next_session_starts_clean() {
        let (mut game, mut pad, mut rec) = started();
        game.ledger.add(40);
        game.field.set(ROWS - 1, 0, true);
        pad.switch = true;
        game.step(&mut pad, &mut rec);
        pad.switch = false;

        tap(&mut game, &mut pad, &mut rec, right);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.ledger().score(), 0);
        assert_eq!(game.field().count(), 4);
    }
}
