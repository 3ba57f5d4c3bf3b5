#![allow(clippy::indexing_slicing, clippy::exit, clippy::unwrap_used)]
fn main() {
    // The linker re-invokes this binary with the failing symbol as arguments.
    explain_linker_error();

    // Host builds (tests, the portable engine) link normally.
    if std::env::var_os("CARGO_FEATURE_BADGE").is_none() {
        return;
    }

    if std::env::var("PROFILE").unwrap_or_default() == "release" {
        println!("cargo:rustc-env=DEFMT_LOG=off");
    }

    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
    println!(
        "cargo:rustc-link-arg=-Wl,--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}

fn explain_linker_error() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        return;
    }

    let kind = &args[1];
    let what = &args[2];

    match kind.as_str() {
        "undefined-symbol" => match what.as_str() {
            "_defmt_timestamp" => {
                eprintln!();
                eprintln!(
                    "💡 `defmt` not found - make sure `defmt.x` is added as a linker script and you have included `use esp_println as _;`"
                );
                eprintln!();
            }
            "_stack_start" => {
                eprintln!();
                eprintln!("💡 Is the linker script `linkall.x` missing?");
                eprintln!();
            }
            "esp_rtos_initialized" | "esp_rtos_yield_task" | "esp_rtos_task_create" => {
                eprintln!();
                eprintln!(
                    "💡 `esp-rtos` has not been started. Make sure `esp_rtos::start` runs before the game tasks are spawned."
                );
                eprintln!();
            }
            _ => (),
        },
        _ => {
            std::process::exit(1);
        }
    }

    std::process::exit(0);
}
