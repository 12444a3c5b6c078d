//! Interactive commands typed while a countdown runs

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Pause,
    Resume,
    /// Pause button: pause when running, resume when paused
    Toggle,
    Finish,
    Status,
    Quit,
    Help,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Ok(ConsoleCommand::Pause),
            "r" | "resume" => Ok(ConsoleCommand::Resume),
            "" | "t" | "toggle" => Ok(ConsoleCommand::Toggle),
            "f" | "finish" | "done" => Ok(ConsoleCommand::Finish),
            "s" | "status" => Ok(ConsoleCommand::Status),
            "q" | "quit" | "exit" => Ok(ConsoleCommand::Quit),
            "h" | "?" | "help" => Ok(ConsoleCommand::Help),
            other => Err(format!("unknown command '{}', type 'help' for commands", other)),
        }
    }
}

pub const HELP: &str = "commands: [enter]/t toggle pause, p pause, r resume, f finish, s status, q quit";
