mod config;
mod panel;
mod repl;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use padcalc_core::{keys, Key, Keypad, KeypadSettings};

use crate::panel::Panel;

/// Keypad calculator for the terminal.
#[derive(Parser)]
#[command(name = "padcalc", version, about)]
struct Cli {
    /// Config file (default: $PADCALC_CONFIG, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print without colors
    #[arg(long)]
    no_color: bool,

    /// Keys to press, e.g. `2x3` or `27 3√`; `=` is pressed at the end.
    /// Starts an interactive session when empty.
    #[arg(allow_hyphen_values = true)]
    keys: Vec<String>,
}

/// Presses `pressed`, then `=` unless it was the last key.
fn run_keys(settings: KeypadSettings, mut pressed: Vec<Key>) -> Keypad {
    if pressed.last() != Some(&Key::Equals) {
        pressed.push(Key::Equals);
    }
    pressed
        .iter()
        .fold(Keypad::new(settings), |pad, key| pad.press(key))
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    let panel = Panel::new(config.display.color && !cli.no_color);

    if cli.keys.is_empty() {
        repl::run(&config, &panel)?;
        return Ok(ExitCode::SUCCESS);
    }

    let pressed = keys::parse_line(&cli.keys.join(" "))?;
    let keypad = run_keys(config.keypad, pressed);
    println!("{}", panel.answer_line(&keypad));
    Ok(match keypad.answer() {
        Some(Err(_)) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
