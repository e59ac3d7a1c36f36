use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use tintview_core::{Msg, Theme};
use tintview_logging::tint_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "" | "r" => Some(Command::Dispatch(Msg::FetchRequested)),
        "d" => Some(Command::Dispatch(Msg::ThemeChanged(Theme::Dark))),
        "l" => Some(Command::Dispatch(Msg::ThemeChanged(Theme::Light))),
        "q" => Some(Command::Quit),
        _ => None,
    }
}

/// Reads stdin on its own thread; the channel closes at end of input.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Command>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    let quit = command == Command::Quit;
                    if tx.send(command).is_err() || quit {
                        break;
                    }
                }
                None => tint_warn!("unknown command {:?}", line.trim()),
            }
        }
    });
}
