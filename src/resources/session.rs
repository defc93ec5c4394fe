use bevy::log::{debug, warn};
use bevy::prelude::Resource;

use crate::protocol::{Command, Response};
use crate::save::SavedGame;
use crate::status::GameStatus;
use crate::{Mode, Player};

pub const CELL_COUNT: usize = 9;

/*
 * Cells are stored row-major: index = row * 3 + col.
 * Rows are lettered from the top and columns numbered from 1, so
 * (0,0) -> A1, (0,2) -> A3, (1,0) -> B1, ..., (2,2) -> C3.
 */
pub const CELL_NAMES: [&str; CELL_COUNT] = ["A1", "A2", "A3", "B1", "B2", "B3", "C1", "C2", "C3"];

/// Side the human plays when the server is the opponent.
const HUMAN_SIDE: Player = Player::X;

pub fn cell_position(index: usize) -> (u8, u8) {
    ((index / 3) as u8, (index % 3) as u8)
}

pub fn cell_index(row: u8, col: u8) -> usize {
    row as usize * 3 + col as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub mark: Option<Player>,
    pub enabled: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            mark: None,
            enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub wins_x: u32,
    pub wins_o: u32,
    pub ties: u32,
}

impl Stats {
    pub fn record_win(&mut self, player: Player) {
        match player {
            Player::X => self.wins_x = self.wins_x.saturating_add(1),
            Player::O => self.wins_o = self.wins_o.saturating_add(1),
        }
    }

    pub fn record_tie(&mut self) {
        self.ties = self.ties.saturating_add(1);
    }
}

/// Client side of a game against the serial server.
///
/// Every user action returns the commands it produced; the caller writes them
/// to the link in order. Server responses go through [`Session::apply`].
#[derive(Resource, Clone, Debug)]
pub struct Session {
    turn: Player,
    mode: Mode,
    ai_vs_ai_active: bool,
    cells: [Cell; CELL_COUNT],
    stats: Stats,
    status: GameStatus,
    start_enabled: bool,
    mode_select_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            turn: Player::X,
            mode: Mode::HotSeat,
            ai_vs_ai_active: false,
            cells: [Cell::default(); CELL_COUNT],
            stats: Stats::default(),
            status: GameStatus::default(),
            start_enabled: false,
            mode_select_enabled: true,
        }
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_ai_vs_ai_active(&self) -> bool {
        self.ai_vs_ai_active
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    pub fn mode_select_enabled(&self) -> bool {
        self.mode_select_enabled
    }

    /// Sent as soon as the link is open so the server plays the mode shown.
    pub fn open_commands(&self) -> Vec<Command> {
        vec![Command::SetMode(self.mode)]
    }

    pub fn can_click(&self, index: usize) -> bool {
        let Some(cell) = self.cells.get(index) else {
            return false;
        };
        if !cell.enabled || self.status.is_game_over() || self.mode == Mode::AiVsAi {
            return false;
        }
        !self.mode.is_ai_opponent() || self.turn == HUMAN_SIDE
    }

    pub fn click_cell(&mut self, index: usize) -> Option<Command> {
        if !self.can_click(index) {
            debug!("Ignoring click on cell {index}");
            return None;
        }
        let (row, col) = cell_position(index);
        self.place(index);
        Some(Command::Move { row, col })
    }

    pub fn restart(&mut self) -> Vec<Command> {
        self.ai_vs_ai_active = false;
        self.reset_board();
        self.enable_ai_vs_ai_controls();
        vec![Command::Reset]
    }

    pub fn new_game(&mut self) -> Vec<Command> {
        let commands = self.restart();
        self.stats = Stats::default();
        commands
    }

    /// Switching to the mode already shown is a no-op.
    pub fn select_mode(&mut self, mode: Mode) -> Vec<Command> {
        if !self.mode_select_enabled || mode == self.mode {
            return Vec::new();
        }
        self.ai_vs_ai_active = false;
        self.mode = mode;
        self.start_enabled = mode == Mode::AiVsAi;
        self.reset_board();
        vec![Command::SetMode(mode)]
    }

    pub fn start_ai_vs_ai(&mut self) -> Vec<Command> {
        if self.mode != Mode::AiVsAi || self.ai_vs_ai_active {
            return Vec::new();
        }
        self.ai_vs_ai_active = true;
        self.start_enabled = false;
        self.mode_select_enabled = false;
        self.reset_board();
        self.disable_all_cells();
        vec![Command::Reset, Command::AiVsAi]
    }

    /// Applies a server response, returning the notice to show the user, if any.
    pub fn apply(&mut self, response: Response) -> Option<String> {
        match response {
            Response::AiMove { row, col } => {
                let index = cell_index(row, col);
                if let Some(mark) = self.cells[index].mark {
                    warn!("Server moved onto occupied cell {index} (held by {mark})");
                }
                self.place(index);
                None
            }
            Response::Winner(player) => {
                self.stats.record_win(player);
                self.status.set_winner(player);
                self.finish_game();
                Some(format!("Player {player} wins!"))
            }
            Response::Tie => {
                self.stats.record_tie();
                self.status.set_tie(true);
                self.finish_game();
                Some("Game ended in a tie!".to_string())
            }
            Response::Ack => None,
        }
    }

    pub fn snapshot(&self) -> SavedGame {
        SavedGame {
            turn: self.turn,
            mode: self.mode,
            cells: self.cells.map(|cell| cell.mark),
            stats: self.stats,
        }
    }

    pub fn restore(&mut self, saved: &SavedGame) -> Vec<Command> {
        self.turn = saved.turn;
        self.mode = saved.mode;
        self.cells = saved.cells.map(|mark| Cell {
            mark,
            enabled: mark.is_none(),
        });
        self.stats = saved.stats;
        self.status = GameStatus::default();
        self.ai_vs_ai_active = false;
        self.start_enabled = saved.mode == Mode::AiVsAi;
        self.mode_select_enabled = true;
        vec![Command::SetMode(saved.mode)]
    }

    fn place(&mut self, index: usize) {
        let cell = &mut self.cells[index];
        cell.mark = Some(self.turn);
        cell.enabled = false;
        self.turn = self.turn.opponent();
    }

    fn reset_board(&mut self) {
        self.cells = [Cell::default(); CELL_COUNT];
        self.turn = Player::X;
        self.status = GameStatus::default();
    }

    fn disable_all_cells(&mut self) {
        for cell in &mut self.cells {
            cell.enabled = false;
        }
    }

    fn finish_game(&mut self) {
        self.status.set_game_over(true);
        self.disable_all_cells();
        self.ai_vs_ai_active = false;
        self.enable_ai_vs_ai_controls();
    }

    fn enable_ai_vs_ai_controls(&mut self) {
        if self.mode == Mode::AiVsAi {
            self.start_enabled = true;
            self.mode_select_enabled = true;
        }
    }
}
