//! Crate-wide error type.

use std::path::PathBuf;

use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error, From)]
pub enum ClientError {
    #[display("serial port error: {_0}")]
    Serial(serialport::Error),
    #[display("{_0}")]
    Io(std::io::Error),
    #[display("save file error: {_0}")]
    Ini(ini::Error),
    #[display("save file {} not found", _0.display())]
    #[from(skip)]
    SaveNotFound(#[error(not(source))] PathBuf),
    #[display("invalid save file: {_0}")]
    #[from(skip)]
    InvalidSave(#[error(not(source))] String),
    #[display("serial link is not open")]
    LinkUnavailable,
}
