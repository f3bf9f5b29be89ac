use std::io::{self, stderr, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Read a passphrase without echoing it.
///
/// Falls back to a plain line read when stdin is not a terminal, so the
/// passphrase can be piped in.
pub fn read_passphrase(prompt: &str) -> io::Result<String> {
    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    eprint!("{prompt}");
    stderr().flush()?;

    enable_raw_mode()?;
    let result = read_hidden_line();
    // crossterm remembers the previous mode and restores it.
    let _ = disable_raw_mode();
    eprintln!();
    result
}

fn read_hidden_line() -> io::Result<String> {
    let mut line = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Backspace => {
                line.pop();
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "passphrase entry cancelled",
                ));
            }
            KeyCode::Esc => {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "passphrase entry cancelled",
                ));
            }
            KeyCode::Char(ch) => line.push(ch),
            _ => {}
        }
    }
}
