use anyhow::{Context, Result};
use padcalc_core::{keys, Keypad};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::{config::Config, panel::Panel};

const HELP: &str = "\
type keys and press enter, e.g. `2x3=` or `27 3√ =`
multi-char keys (x2 x3 3√ log AC DEL +/-) must stand alone as words
:keys  show the keypad    :q  quit";

pub fn run(config: &Config, panel: &Panel) -> Result<()> {
    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(config.display.prompt.clone()),
        DefaultPromptSegment::Empty,
    );
    let mut keypad = Keypad::new(config.keypad);

    println!("{HELP}");
    loop {
        let line = match line_editor.read_line(&prompt).context("reading input")? {
            Signal::Success(line) => line,
            _ => break,
        };

        match line.trim() {
            "" => continue,
            ":q" | ":quit" => break,
            ":keys" => {
                println!("{}", panel.layout());
                continue;
            }
            ":help" => {
                println!("{HELP}");
                continue;
            }
            _ => {}
        }

        match keys::parse_line(&line) {
            Ok(pressed) => {
                keypad = pressed.iter().fold(keypad, |pad, key| pad.press(key));
                println!("{}", panel.render(&keypad));
            }
            Err(err) => println!("{}", panel.error(err)),
        }
    }
    Ok(())
}
