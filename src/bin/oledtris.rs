//! oledtris on the Disobey 2026 badge.
//!
//! The LCD shows the OLED frame doubled in size. Hold the badge with the
//! D-pad at the bottom left to play in portrait.
//!
//! Controls:
//! - Down: soft drop / confirm name
//! - A: rotate / highscores / previous letter
//! - Left: move left / next letter
//! - Right: move right / start / continue / next letter slot
//! - Select (hold): abandon the session

#![no_std]
#![no_main]

use defmt::info;
#[allow(clippy::wildcard_imports)]
use oledtris::*;
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Ticker,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    timer::timg::TimerGroup,
};
use esp_println as _;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

/// Period of the game's timer flag.
const TICK_MS: u64 = 100;
/// Button sampling period; two equal samples make a debounced level.
const POLL_MS: u64 = 8;
/// Pause between main-loop iterations.
const STEP_MS: u64 = 10;

static INPUT: SharedInput = SharedInput::new();

#[embassy_executor::task]
async fn input_task(buttons: &'static mut Buttons) {
    info!("input task started");
    let mut previous = [false; 5];
    loop {
        INPUT.sample(buttons, &mut previous);
        Timer::after(Duration::from_millis(POLL_MS)).await;
    }
}

#[embassy_executor::task]
async fn tick_task() {
    info!("tick task started");
    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        ticker.next().await;
        INPUT.raise_timer();
    }
}

#[embassy_executor::task]
async fn game_task(display: &'static mut Display<'static>, backlight: &'static mut Backlight) {
    backlight.on();
    info!("game task started");

    let mut painter = Painter::new(LcdScreen::new(display), Delay::new());
    let mut controls = &INPUT;
    let mut game = Game::new();
    game.redraw(&mut painter);

    loop {
        game.step(&mut controls, &mut painter);
        Timer::after(Duration::from_millis(STEP_MS)).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = oledtris::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 32 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let display = mk_static!(Display<'static>, resources.display.into());
    let backlight = mk_static!(Backlight, resources.backlight.into());
    let buttons = mk_static!(Buttons, resources.buttons.into());

    spawner.must_spawn(input_task(buttons));
    spawner.must_spawn(tick_task());
    spawner.must_spawn(game_task(display, backlight));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
