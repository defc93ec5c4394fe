use std::path::PathBuf;

use bevy::prelude::Resource;
use clap::Parser;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_SAVE_FILE: &str = "gameState.ini";
pub const DEFAULT_LOG_FILTER: &str = "wgpu_core=warn,wgpu_hal=warn,tictactoe_serial=debug";

/// Launch options. Every flag can also come from the environment or a `.env` file.
#[derive(Parser, Resource, Debug, Clone, PartialEq, Eq)]
#[command(name = "tictactoe-serial", version, about = "Tic-tac-toe client for a serial game server")]
pub struct ClientConfig {
    /// Serial port to open on launch. The port picker is shown when omitted.
    #[arg(short, long, env = "TICTACTOE_PORT")]
    pub port: Option<String>,

    /// Line speed of the serial link.
    #[arg(short, long, env = "TICTACTOE_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Where Save and Load keep the game state.
    #[arg(long, env = "TICTACTOE_SAVE_FILE", default_value = DEFAULT_SAVE_FILE)]
    pub save_file: PathBuf,

    /// Log filter directives, e.g. `tictactoe_serial=trace`.
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl ClientConfig {
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: DEFAULT_BAUD_RATE,
            save_file: PathBuf::from(DEFAULT_SAVE_FILE),
            log_filter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_server_link() {
        let config = ClientConfig::try_parse_from(["tictactoe-serial"]).unwrap();
        assert_eq!(config.baud, 9600);
        assert_eq!(config.save_file, PathBuf::from("gameState.ini"));
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config, ClientConfig { port: config.port.clone(), ..Default::default() });
    }

    #[test]
    fn flags_override_defaults() {
        let config = ClientConfig::try_parse_from([
            "tictactoe-serial",
            "--port",
            "/dev/ttyUSB0",
            "--baud",
            "115200",
            "--save-file",
            "/tmp/match.ini",
            "--log-filter",
            "tictactoe_serial=trace",
        ])
        .unwrap();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.baud, 115200);
        assert_eq!(config.save_file, PathBuf::from("/tmp/match.ini"));
        assert_eq!(config.log_filter(), "tictactoe_serial=trace");
    }

    #[test]
    fn rejects_non_numeric_baud() {
        assert!(ClientConfig::try_parse_from(["tictactoe-serial", "--baud", "fast"]).is_err());
    }
}
