//! Button edge detection and the hardware input seam.

/// The four push-buttons, named after their in-game role.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// BTN1: soft drop, confirms a name.
    Drop,
    /// BTN2: rotate, opens the highscore list, previous letter.
    Rotate,
    /// BTN3: move left, next letter.
    Left,
    /// BTN4: move right, start / continue, next name slot.
    Right,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Drop, Button::Rotate, Button::Left, Button::Right];

    const fn slot(self) -> usize {
        match self {
            Button::Drop => 0,
            Button::Rotate => 1,
            Button::Left => 2,
            Button::Right => 3,
        }
    }
}

/// What the game reads from the hardware on every loop iteration.
pub trait Controls {
    /// Level of a button, `true` while pressed.
    fn is_pressed(&self, button: Button) -> bool;

    /// Level of the reset switch, `true` while switched on.
    fn reset_switch(&self) -> bool;

    /// Whether the periodic timer expired since the last call. Reading the
    /// flag clears it.
    fn take_timer_flag(&mut self) -> bool;

    /// Free-running counter used as an entropy source.
    fn free_running(&self) -> u32;
}

/// Latch that turns a sampled button level into press/release edges.
///
/// A press registers once; holding the button does not re-trigger until it
/// has been released.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDetector {
    latched: bool,
    pressed: bool,
    released: bool,
}

impl EdgeDetector {
    /// Feed the level sampled this iteration.
    pub fn update(&mut self, level: bool) {
        self.pressed = level && !self.latched;
        self.released = !level && self.latched;
        self.latched = level;
    }

    pub fn pressed_this_tick(&self) -> bool {
        self.pressed
    }

    pub fn released_this_tick(&self) -> bool {
        self.released
    }

    pub fn is_held(&self) -> bool {
        self.latched
    }
}

/// One edge detector per button.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLatches {
    latches: [EdgeDetector; 4],
}

impl ButtonLatches {
    /// Sample every button level from `controls`.
    pub fn update(&mut self, controls: &impl Controls) {
        for button in Button::ALL {
            self.latches[button.slot()].update(controls.is_pressed(button));
        }
    }

    pub fn get(&self, button: Button) -> &EdgeDetector {
        &self.latches[button.slot()]
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.get(button).pressed_this_tick()
    }

    pub fn held(&self, button: Button) -> bool {
        self.get(button).is_held()
    }
}
