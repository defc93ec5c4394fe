pub mod config;
pub mod error;
pub mod network;
pub mod protocol;
pub mod resources;
pub mod save;
pub mod status;
pub mod ui;

use std::fmt;

use bevy::prelude::*;

pub use config::ClientConfig;
pub use error::ClientError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Player {
    #[default]
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "X" => Some(Player::X),
            "O" => Some(Player::O),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Game modes, numbered the way the server expects them in `G,<mode>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Mode {
    #[default]
    HotSeat,
    AiEasy,
    AiHard,
    AiVsAi,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::HotSeat, Mode::AiEasy, Mode::AiHard, Mode::AiVsAi];

    pub fn index(self) -> u8 {
        match self {
            Mode::HotSeat => 0,
            Mode::AiEasy => 1,
            Mode::AiHard => 2,
            Mode::AiVsAi => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Human plays X against the server's O.
    pub fn is_ai_opponent(self) -> bool {
        matches!(self, Mode::AiEasy | Mode::AiHard)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::HotSeat => "Hot Seat",
            Mode::AiEasy => "AI Easy",
            Mode::AiHard => "AI Hard",
            Mode::AiVsAi => "AI vs AI",
        }
    }
}

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppState {
    #[default]
    PortSelect,
    Game,
}

pub struct TicTacToe;

impl Plugin for TicTacToe {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.add_plugins(network::SerialLinkPlugin);
        app.enable_state_scoped_entities::<AppState>();

        ui::setup_systems(app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_indices_follow_server_numbering() {
        for (expected, mode) in Mode::ALL.into_iter().enumerate() {
            assert_eq!(mode.index() as usize, expected);
            assert_eq!(Mode::from_index(expected as u8), Some(mode));
        }
        assert_eq!(Mode::from_index(4), None);
    }

    #[test]
    fn only_single_ai_modes_have_a_human_opponent_side() {
        assert!(!Mode::HotSeat.is_ai_opponent());
        assert!(Mode::AiEasy.is_ai_opponent());
        assert!(Mode::AiHard.is_ai_opponent());
        assert!(!Mode::AiVsAi.is_ai_opponent());
    }

    #[test]
    fn player_symbols() {
        assert_eq!(Player::from_symbol("X"), Some(Player::X));
        assert_eq!(Player::from_symbol("O"), Some(Player::O));
        assert_eq!(Player::from_symbol("x"), None);
        assert_eq!(Player::X.opponent(), Player::O);
        assert_eq!(Player::O.to_string(), "O");
    }
}
