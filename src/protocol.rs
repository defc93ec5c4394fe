//! Line protocol spoken with the game server.
//!
//! Every message is one line of comma separated ASCII fields. The client
//! sends [`Command`]s and the server answers with [`Response`]s; there is no
//! request/response matching, the server simply reports what happened.

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Error};

use crate::{Mode, Player};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `G,<mode>`
    SetMode(Mode),
    /// `M,<row>,<col>`
    Move { row: u8, col: u8 },
    /// `R`
    Reset,
    /// `V`, server plays both sides until the game ends.
    AiVsAi,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetMode(mode) => write!(f, "G,{}", mode.index()),
            Command::Move { row, col } => write!(f, "M,{row},{col}"),
            Command::Reset => f.write_str("R"),
            Command::AiVsAi => f.write_str("V"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// `A,<row>,<col>`
    AiMove { row: u8, col: u8 },
    /// `W,<symbol>`
    Winner(Player),
    /// `T`
    Tie,
    /// `OK`
    Ack,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    #[display("empty line")]
    Empty,
    #[display("unknown response '{_0}'")]
    UnknownTag(#[error(not(source))] String),
    #[display("'{tag}' takes {expected} field(s), got {got}")]
    FieldCount {
        tag: &'static str,
        expected: usize,
        got: usize,
    },
    #[display("invalid board coordinate '{_0}'")]
    InvalidCoordinate(#[error(not(source))] String),
    #[display("unknown player symbol '{_0}'")]
    UnknownSymbol(#[error(not(source))] String),
}

impl FromStr for Response {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields[0] {
            "A" => {
                expect_fields("A", &fields, 3)?;
                Ok(Response::AiMove {
                    row: coordinate(fields[1])?,
                    col: coordinate(fields[2])?,
                })
            }
            "W" => {
                expect_fields("W", &fields, 2)?;
                Player::from_symbol(fields[1])
                    .map(Response::Winner)
                    .ok_or_else(|| ProtocolError::UnknownSymbol(fields[1].to_owned()))
            }
            "T" => {
                expect_fields("T", &fields, 1)?;
                Ok(Response::Tie)
            }
            "OK" => {
                expect_fields("OK", &fields, 1)?;
                Ok(Response::Ack)
            }
            tag => Err(ProtocolError::UnknownTag(tag.to_owned())),
        }
    }
}

fn expect_fields(tag: &'static str, fields: &[&str], expected: usize) -> Result<(), ProtocolError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::FieldCount {
            tag,
            expected,
            got: fields.len(),
        })
    }
}

fn coordinate(field: &str) -> Result<u8, ProtocolError> {
    match field.parse::<u8>() {
        Ok(n) if n <= 2 => Ok(n),
        _ => Err(ProtocolError::InvalidCoordinate(field.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_render_wire_text() {
        assert_eq!(Command::SetMode(Mode::HotSeat).to_string(), "G,0");
        assert_eq!(Command::SetMode(Mode::AiVsAi).to_string(), "G,3");
        assert_eq!(Command::Move { row: 2, col: 0 }.to_string(), "M,2,0");
        assert_eq!(Command::Reset.to_string(), "R");
        assert_eq!(Command::AiVsAi.to_string(), "V");
    }

    #[test]
    fn decodes_each_response() {
        assert_eq!("A,1,2".parse(), Ok(Response::AiMove { row: 1, col: 2 }));
        assert_eq!("W,X".parse(), Ok(Response::Winner(Player::X)));
        assert_eq!("W,O".parse(), Ok(Response::Winner(Player::O)));
        assert_eq!("T".parse(), Ok(Response::Tie));
        assert_eq!("OK".parse(), Ok(Response::Ack));
    }

    #[test]
    fn tolerates_line_endings_and_padding() {
        assert_eq!("A, 0 ,1\r\n".parse(), Ok(Response::AiMove { row: 0, col: 1 }));
        assert_eq!("  OK\r".parse(), Ok(Response::Ack));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!("".parse::<Response>(), Err(ProtocolError::Empty));
        assert_eq!("\r\n".parse::<Response>(), Err(ProtocolError::Empty));
        assert_eq!(
            "Z,1".parse::<Response>(),
            Err(ProtocolError::UnknownTag("Z".into()))
        );
        assert_eq!(
            "ok".parse::<Response>(),
            Err(ProtocolError::UnknownTag("ok".into()))
        );
        assert_eq!(
            "A,1".parse::<Response>(),
            Err(ProtocolError::FieldCount {
                tag: "A",
                expected: 3,
                got: 2
            })
        );
        assert_eq!(
            "A,1,x".parse::<Response>(),
            Err(ProtocolError::InvalidCoordinate("x".into()))
        );
        assert_eq!(
            "A,3,0".parse::<Response>(),
            Err(ProtocolError::InvalidCoordinate("3".into()))
        );
        assert_eq!(
            "A,-1,0".parse::<Response>(),
            Err(ProtocolError::InvalidCoordinate("-1".into()))
        );
        assert_eq!(
            "W,Z".parse::<Response>(),
            Err(ProtocolError::UnknownSymbol("Z".into()))
        );
        assert!("T,X".parse::<Response>().is_err());
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = "A,1".parse::<Response>().unwrap_err();
        assert_eq!(err.to_string(), "'A' takes 3 field(s), got 2");
    }
}
