//! Build script for metron-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml and generates the board constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs on the RP2040
const GPIO_COUNT: i64 = 30;

/// GPIOs main.rs can bind to a PWM slice (channel A of slices 0-3)
const WIRED_PWM: [i64; 4] = [16, 18, 20, 22];

fn main() {
    setup_linker();
    let board = load_board();
    generate_board_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of board.toml
struct BoardToml {
    baud: i64,
    pin_count: i64,
    reserved: Vec<i64>,
    pwm: Vec<i64>,
}

fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn int_list(value: Option<&toml::Value>, key: &str, errors: &mut Vec<String>) -> Vec<i64> {
    match value {
        None => Vec::new(),
        Some(toml::Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                toml::Value::Integer(n) => Some(*n),
                _ => {
                    errors.push(format!("[pins] {} must contain integers", key));
                    None
                }
            })
            .collect(),
        Some(_) => {
            errors.push(format!("[pins] {} must be an array", key));
            Vec::new()
        }
    }
}

/// Parse and validate board.toml
fn load_board() -> BoardToml {
    println!("cargo:rerun-if-changed=board.toml");

    let path = Path::new("board.toml");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };
    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in board.toml", &[e.to_string()]),
    };

    let mut errors = Vec::new();

    let baud = match config.get("uart").and_then(|u| u.get("baud")) {
        Some(toml::Value::Integer(b)) if *b > 0 => *b,
        Some(_) => {
            errors.push("[uart] baud must be a positive integer".into());
            0
        }
        None => {
            errors.push("[uart] missing 'baud'".into());
            0
        }
    };

    let pins = config.get("pins");
    let pin_count = match pins.and_then(|p| p.get("count")) {
        Some(toml::Value::Integer(n)) if (1..=GPIO_COUNT).contains(n) => *n,
        Some(_) => {
            errors.push(format!("[pins] count must be 1-{}", GPIO_COUNT));
            GPIO_COUNT
        }
        None => {
            errors.push("[pins] missing 'count'".into());
            GPIO_COUNT
        }
    };

    let reserved = int_list(pins.and_then(|p| p.get("reserved")), "reserved", &mut errors);
    let pwm = int_list(pins.and_then(|p| p.get("pwm")), "pwm", &mut errors);

    for &pin in reserved.iter().chain(&pwm) {
        if pin < 0 || pin >= pin_count {
            errors.push(format!("[pins] pin {} outside 0-{}", pin, pin_count - 1));
        }
    }
    if reserved.len() > 8 {
        errors.push("[pins] at most 8 reserved pins".into());
    }

    for &pin in &pwm {
        if reserved.contains(&pin) {
            errors.push(format!("[pins] pwm pin {} is reserved", pin));
        }
        if !WIRED_PWM.contains(&pin) {
            errors.push(format!("[pins] pwm pin {} has no slice wired", pin));
        }
    }

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    BoardToml {
        baud,
        pin_count,
        reserved,
        pwm,
    }
}

/// Write the board constants to OUT_DIR/board_config.rs
fn generate_board_config(board: &BoardToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let list = |pins: &[i64]| {
        pins.iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let source = format!(
        "/// Host link baud rate\n\
         pub const UART_BAUD: u32 = {};\n\
         /// Pins `0..PIN_COUNT` exist on the board\n\
         pub const PIN_COUNT: u32 = {};\n\
         /// Pins the host may not drive\n\
         pub const RESERVED_PINS: &[u32] = &[{}];\n\
         /// Pins wired to a PWM slice\n\
         pub const PWM_PINS: &[u32] = &[{}];\n",
        board.baud,
        board.pin_count,
        list(&board.reserved),
        list(&board.pwm),
    );

    fs::write(out_dir.join("board_config.rs"), source).unwrap();
}
