//! INI save file holding the board, turn, mode and scoreboard.
//!
//! ```ini
//! [Game]
//! Turn=X
//! Mode=0
//! [Board]
//! A1=X
//! A2=
//! ...
//! [Stats]
//! WinsX=1
//! WinsO=0
//! Ties=2
//! ```

use std::path::Path;
use std::str::FromStr;

use bevy::log::{info, warn};
use ini::Ini;

use crate::error::ClientError;
use crate::protocol::Command;
use crate::resources::{CELL_COUNT, CELL_NAMES, Notices, Session, Stats};
use crate::{Mode, Player};

const GAME: &str = "Game";
const BOARD: &str = "Board";
const STATS: &str = "Stats";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedGame {
    pub turn: Player,
    pub mode: Mode,
    pub cells: [Option<Player>; CELL_COUNT],
    pub stats: Stats,
}

impl SavedGame {
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some(GAME))
            .set("Turn", self.turn.symbol())
            .set("Mode", self.mode.index().to_string());

        let mut board = ini.with_section(Some(BOARD));
        for (name, mark) in CELL_NAMES.iter().zip(&self.cells) {
            board.set(*name, mark.map(Player::symbol).unwrap_or_default());
        }

        ini.with_section(Some(STATS))
            .set("WinsX", self.stats.wins_x.to_string())
            .set("WinsO", self.stats.wins_o.to_string())
            .set("Ties", self.stats.ties.to_string());
        ini
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, ClientError> {
        // Anything but X reads as O.
        let turn = match value(ini, GAME, "Turn")? {
            "X" => Player::X,
            _ => Player::O,
        };

        let mode = number::<u8>(ini, GAME, "Mode")
            .ok()
            .and_then(Mode::from_index)
            .ok_or_else(|| invalid(GAME, "Mode"))?;

        let mut cells = [None; CELL_COUNT];
        for (cell, name) in cells.iter_mut().zip(CELL_NAMES) {
            *cell = match value(ini, BOARD, name)? {
                "" => None,
                symbol => Some(Player::from_symbol(symbol).ok_or_else(|| invalid(BOARD, name))?),
            };
        }

        let stats = Stats {
            wins_x: number(ini, STATS, "WinsX")?,
            wins_o: number(ini, STATS, "WinsO")?,
            ties: number(ini, STATS, "Ties")?,
        };

        Ok(Self {
            turn,
            mode,
            cells,
            stats,
        })
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        self.to_ini().write_to_file(path)?;
        info!("Game state saved to {}", path.display());
        Ok(())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClientError::SaveNotFound(path.to_path_buf()));
        }
        let saved = Self::from_ini(&Ini::load_from_file(path)?)?;
        info!("Game state loaded from {}", path.display());
        Ok(saved)
    }
}

/// Saves `session` to `path` and reports the outcome as a notice.
pub fn save_session(session: &Session, notices: &mut Notices, path: &Path) {
    match session.snapshot().save_to(path) {
        Ok(()) => notices.push("Game state saved!"),
        Err(err) => {
            warn!("Saving {} failed: {err}", path.display());
            notices.push(format!("Error saving game: {err}"));
        }
    }
}

/// Loads `path` into `session` and reports the outcome as a notice.
///
/// Returns the commands that bring the server onto the loaded mode.
pub fn load_session(session: &mut Session, notices: &mut Notices, path: &Path) -> Vec<Command> {
    match SavedGame::load_from(path) {
        Ok(saved) => {
            notices.push("Game state loaded!");
            session.restore(&saved)
        }
        Err(ClientError::SaveNotFound(_)) => {
            notices.push("No save file found!");
            Vec::new()
        }
        Err(err) => {
            warn!("Loading {} failed: {err}", path.display());
            notices.push(format!("Error loading game: {err}"));
            Vec::new()
        }
    }
}

fn value<'a>(ini: &'a Ini, section: &str, key: &str) -> Result<&'a str, ClientError> {
    ini.section(Some(section))
        .and_then(|props| props.get(key))
        .map(str::trim)
        .ok_or_else(|| ClientError::InvalidSave(format!("missing [{section}] {key}")))
}

fn number<T: FromStr>(ini: &Ini, section: &str, key: &str) -> Result<T, ClientError> {
    value(ini, section, key)?
        .parse()
        .map_err(|_| invalid(section, key))
}

fn invalid(section: &str, key: &str) -> ClientError {
    ClientError::InvalidSave(format!("bad value for [{section}] {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SavedGame {
        let mut cells = [None; CELL_COUNT];
        cells[0] = Some(Player::X);
        cells[4] = Some(Player::O);
        cells[8] = Some(Player::X);
        SavedGame {
            turn: Player::O,
            mode: Mode::AiHard,
            cells,
            stats: Stats {
                wins_x: 3,
                wins_o: 1,
                ties: 2,
            },
        }
    }

    #[test]
    fn writes_the_three_sections() {
        let ini = sample().to_ini();

        let game = ini.section(Some("Game")).unwrap();
        assert_eq!(game.get("Turn"), Some("O"));
        assert_eq!(game.get("Mode"), Some("2"));

        let board = ini.section(Some("Board")).unwrap();
        assert_eq!(board.get("A1"), Some("X"));
        assert_eq!(board.get("A2"), Some(""));
        assert_eq!(board.get("B2"), Some("O"));
        assert_eq!(board.get("C3"), Some("X"));

        let stats = ini.section(Some("Stats")).unwrap();
        assert_eq!(stats.get("WinsX"), Some("3"));
        assert_eq!(stats.get("WinsO"), Some("1"));
        assert_eq!(stats.get("Ties"), Some("2"));
    }

    #[test]
    fn reads_back_what_it_writes() {
        let saved = sample();
        assert_eq!(SavedGame::from_ini(&saved.to_ini()).unwrap(), saved);
    }

    #[test]
    fn reads_hand_written_file() {
        let text = "[Game]\nTurn=X\nMode=3\n[Board]\nA1=\nA2=O\nA3=\nB1=\nB2=X\nB3=\nC1=\nC2=\nC3=\n[Stats]\nWinsX=0\nWinsO=5\nTies=0\n";
        let saved = SavedGame::from_ini(&Ini::load_from_str(text).unwrap()).unwrap();
        assert_eq!(saved.turn, Player::X);
        assert_eq!(saved.mode, Mode::AiVsAi);
        assert_eq!(saved.cells[1], Some(Player::O));
        assert_eq!(saved.cells[4], Some(Player::X));
        assert_eq!(saved.stats.wins_o, 5);
    }

    #[test]
    fn unknown_turn_reads_as_o() {
        let mut ini = sample().to_ini();
        ini.with_section(Some("Game")).set("Turn", "?");
        assert_eq!(SavedGame::from_ini(&ini).unwrap().turn, Player::O);
    }

    #[test]
    fn rejects_missing_keys_and_bad_values() {
        let mut ini = sample().to_ini();
        ini.delete_from(Some("Board"), "B2");
        assert!(matches!(
            SavedGame::from_ini(&ini),
            Err(ClientError::InvalidSave(msg)) if msg.contains("B2")
        ));

        let mut ini = sample().to_ini();
        ini.with_section(Some("Game")).set("Mode", "7");
        assert!(matches!(SavedGame::from_ini(&ini), Err(ClientError::InvalidSave(_))));

        let mut ini = sample().to_ini();
        ini.with_section(Some("Stats")).set("Ties", "-1");
        assert!(matches!(SavedGame::from_ini(&ini), Err(ClientError::InvalidSave(_))));

        let mut ini = sample().to_ini();
        ini.with_section(Some("Board")).set("A2", "Q");
        assert!(matches!(SavedGame::from_ini(&ini), Err(ClientError::InvalidSave(_))));
    }
}
