// repl.rs

use std::time::Duration;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

use crate::calculator::{Calculator, KeyOutcome};
use crate::completion::KeypadHelper;
use crate::keypad::parse_line;
use crate::render::{display, history_view, writeln_ignore_broken_pipe};
use crate::storage::KeyValueStore;

const STARTUP_LOAD_WAIT: Duration = Duration::from_millis(250);

fn show<S: AsRef<str>>(s: S) {
    let _ = writeln_ignore_broken_pipe(std::io::stdout(), s);
}

/// Run the keypad loop until `exit`, Ctrl-C or Ctrl-D.
pub fn start_repl<S: KeyValueStore + 'static>(calc: &mut Calculator<S>) -> anyhow::Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let mut rl: Editor<KeypadHelper, DefaultHistory> =
        Editor::with_config(config).context("failed to create line editor")?;
    rl.set_helper(Some(KeypadHelper::new()));

    calc.start_loading();
    // A quick local load finishes here, so a failure shows before the first key.
    calc.wait_for_load(STARTUP_LOAD_WAIT);
    show("Keys: 0-9 . + - * / % ^ √ ( ) = C DEL History   (exit to quit)");
    show(display(calc.expression(), calc.result()));

    let mut history_open = false;
    loop {
        let readline = rl.readline("> ");
        calc.poll_load();
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if history_open {
                    history_open = false;
                    if trimmed.is_empty() {
                        show(display(calc.expression(), calc.result()));
                        continue;
                    }
                }
                if trimmed.is_empty() {
                    continue;
                }
                if matches!(trimmed, "exit" | "quit") {
                    break;
                }
                let _ = rl.add_history_entry(trimmed);

                let keys = match parse_line(trimmed) {
                    Ok(keys) => keys,
                    Err(e) => {
                        show(format!("  {}", e));
                        continue;
                    }
                };
                for key in keys {
                    if calc.handle_key(key) == KeyOutcome::ShowHistory {
                        history_open = true;
                    }
                }

                if history_open {
                    show(history_view(calc.load_state(), calc.history()));
                    show("(press Enter to close)");
                } else {
                    show(display(calc.expression(), calc.result()));
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context("failed to read keypad input"));
            }
        }
    }
    Ok(())
}
