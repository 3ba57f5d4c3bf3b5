//! Tick-driven counters: piece fall rate and menu blinking.

/// Timer ticks between fall attempts at the start of a session.
pub const INITIAL_TIMEOUT: u8 = 10;
/// Fall attempts between two speed-ups.
pub const SPEED_UP_EVERY: u8 = 30;
/// Fastest fall rate: one attempt per tick.
pub const MIN_TIMEOUT: u8 = 1;
/// Timer ticks per blink phase on the menus.
pub const BLINK_PERIOD: u8 = 8;

/// Decides on which timer ticks the active piece tries to fall, and speeds
/// the game up over time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FallTimer {
    ticks: u8,
    timeout: u8,
    attempts: u8,
    speed_up_every: u8,
}

impl Default for FallTimer {
    fn default() -> Self {
        Self::new(INITIAL_TIMEOUT, SPEED_UP_EVERY)
    }
}

impl FallTimer {
    pub fn new(timeout: u8, speed_up_every: u8) -> Self {
        Self {
            ticks: 0,
            timeout: timeout.max(MIN_TIMEOUT),
            attempts: 0,
            speed_up_every: speed_up_every.max(1),
        }
    }

    /// Count one timer tick. Returns `true` when a fall attempt is due.
    pub fn tick(&mut self) -> bool {
        self.ticks = self.ticks.saturating_add(1);
        self.ticks >= self.timeout
    }

    /// Record a fall attempt: restart the tick count and, every
    /// `speed_up_every` attempts, shorten the timeout by one tick.
    pub fn fell(&mut self) {
        self.ticks = 0;
        self.attempts += 1;
        if self.attempts >= self.speed_up_every {
            self.attempts = 0;
            if self.timeout > MIN_TIMEOUT {
                self.timeout -= 1;
                debug!("fall timeout now {} ticks", self.timeout);
            }
        }
    }

    /// Ticks counted since the last fall attempt.
    pub const fn ticks(&self) -> u8 {
        self.ticks
    }

    /// Current ticks per fall attempt.
    pub const fn timeout(&self) -> u8 {
        self.timeout
    }
}

/// Blink phase for menu screens, advanced once per timer tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Blink {
    counter: u8,
    hidden: bool,
}

impl Blink {
    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= BLINK_PERIOD {
            self.counter = 0;
            self.hidden = !self.hidden;
        }
    }

    /// Whether the blinking element is currently hidden.
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub const fn counter(&self) -> u8 {
        self.counter
    }
}
