//! Line commands accepted on stdin by the binary.
//!
//! `cab N`, `up N`, `down N` pulse a call; `floor N` sets a one-hot sensor
//! reading; `fault` clears every sensor; `reset on|off` holds the reset line;
//! `quit` stops the driver.

use crate::driver::clock::InputEvent;
use crate::elevator::orders::{FloorMask, RequestKind};
use crate::elevator::position::FloorIndex;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` expects an argument")]
    MissingArgument(&'static str),
    #[error("invalid floor `{0}`")]
    InvalidFloor(String),
    #[error("floor {floor} outside 0..{num_floors}")]
    FloorOutOfRange { floor: FloorIndex, num_floors: u8 },
    #[error("reset expects `on` or `off`, got `{0}`")]
    InvalidReset(String),
}

pub fn parse_command(line: &str, num_floors: u8) -> Result<InputEvent, CommandError> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or(CommandError::Empty)?;
    let argument = words.next();

    let floor_argument = |name: &'static str| -> Result<FloorIndex, CommandError> {
        let word = argument.ok_or(CommandError::MissingArgument(name))?;
        let floor: FloorIndex = word
            .parse()
            .map_err(|_| CommandError::InvalidFloor(word.to_string()))?;
        if floor >= num_floors {
            return Err(CommandError::FloorOutOfRange { floor, num_floors });
        }
        Ok(floor)
    };

    match command {
        "cab" => Ok(InputEvent::Call(RequestKind::Internal, floor_argument("cab")?)),
        "up" => Ok(InputEvent::Call(RequestKind::ExternalUp, floor_argument("up")?)),
        "down" => Ok(InputEvent::Call(RequestKind::ExternalDown, floor_argument("down")?)),
        "floor" => Ok(InputEvent::Sensors(FloorMask::single(floor_argument("floor")?))),
        "fault" => Ok(InputEvent::Sensors(FloorMask::EMPTY)),
        "reset" => match argument {
            Some("on") => Ok(InputEvent::Reset(true)),
            Some("off") => Ok(InputEvent::Reset(false)),
            Some(other) => Err(CommandError::InvalidReset(other.to_string())),
            None => Err(CommandError::MissingArgument("reset")),
        },
        "quit" | "exit" => Ok(InputEvent::Shutdown),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
