use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Discrete movement instruction sent by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    TurnLeft,
    TurnRight,
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    MoveUp,
    MoveDown,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::TurnLeft,
        Command::TurnRight,
        Command::MoveForward,
        Command::MoveBackward,
        Command::StrafeLeft,
        Command::StrafeRight,
        Command::MoveUp,
        Command::MoveDown,
    ];

    /// Wire name used in request bodies
    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::TurnLeft => "turn_left",
            Command::TurnRight => "turn_right",
            Command::MoveForward => "move_forward",
            Command::MoveBackward => "move_backward",
            Command::StrafeLeft => "strafe_left",
            Command::StrafeRight => "strafe_right",
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
        }
    }

    pub const fn is_turn(&self) -> bool {
        matches!(self, Command::TurnLeft | Command::TurnRight)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token that is not one of the known commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command token: {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
