//! Badge buttons mapped onto the game's four buttons and reset switch.
//!
//! An input task samples the pins and publishes debounced levels through
//! [`SharedInput`]; the game task reads them back through [`Controls`].

use core::sync::atomic::{
    AtomicBool,
    Ordering,
};

use esp_hal::{
    gpio::{
        Input,
        InputConfig,
        Pull,
    },
    time::Instant,
};

use crate::{
    ButtonResources,
    input::{
        Button,
        Controls,
    },
};

/// The badge pins the game listens to.
pub struct Buttons {
    /// D-pad down.
    pub drop: Input<'static>,
    /// A.
    pub rotate: Input<'static>,
    pub left: Input<'static>,
    pub right: Input<'static>,
    /// Select, standing in for the reset switch. Active high.
    pub reset: Input<'static>,
}

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            drop: Input::new(res.down, pull_up),
            rotate: Input::new(res.a, pull_up),
            left: Input::new(res.left, pull_up),
            right: Input::new(res.right, pull_up),
            reset: Input::new(res.select, InputConfig::default().with_pull(Pull::Down)),
        }
    }
}

impl Buttons {
    /// Raw levels in [`Button::ALL`] order followed by the reset switch.
    fn levels(&self) -> [bool; 5] {
        [
            self.drop.is_low(),
            self.rotate.is_low(),
            self.left.is_low(),
            self.right.is_low(),
            self.reset.is_high(),
        ]
    }
}

/// Input state shared between the input, tick and game tasks.
pub struct SharedInput {
    levels: [AtomicBool; 5],
    timer: AtomicBool,
}

impl Default for SharedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedInput {
    pub const fn new() -> Self {
        Self {
            levels: [const { AtomicBool::new(false) }; 5],
            timer: AtomicBool::new(false),
        }
    }

    /// Publish the levels that agree with the previous sample; a level that
    /// changed since then is still bouncing and keeps its old value.
    pub fn sample(&self, buttons: &Buttons, previous: &mut [bool; 5]) {
        let now = buttons.levels();
        for ((level, &sampled), prev) in self.levels.iter().zip(&now).zip(previous.iter()) {
            if sampled == *prev {
                level.store(sampled, Ordering::Relaxed);
            }
        }
        *previous = now;
    }

    /// Signal one timer period.
    pub fn raise_timer(&self) {
        self.timer.store(true, Ordering::Relaxed);
    }

    fn level(&self, slot: usize) -> bool {
        self.levels[slot].load(Ordering::Relaxed)
    }
}

impl Controls for &SharedInput {
    fn is_pressed(&self, button: Button) -> bool {
        let slot = match button {
            Button::Drop => 0,
            Button::Rotate => 1,
            Button::Left => 2,
            Button::Right => 3,
        };
        self.level(slot)
    }

    fn reset_switch(&self) -> bool {
        self.level(4)
    }

    fn take_timer_flag(&mut self) -> bool {
        self.timer.swap(false, Ordering::Relaxed)
    }

    fn free_running(&self) -> u32 {
        Instant::now().duration_since_epoch().as_micros() as u32
    }
}
