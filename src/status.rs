use crate::Player;

/// Outcome flags of the current game.
///
/// Each field is set on its own; the setters do not keep them consistent with
/// each other, that is left to [`Session`](crate::resources::Session).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameStatus {
    game_over: bool,
    winner: Option<Player>,
    tie: bool,
}

impl GameStatus {
    pub fn new(game_over: bool, winner: Option<Player>, tie: bool) -> Self {
        Self {
            game_over,
            winner,
            tie,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_tie(&self) -> bool {
        self.tie
    }

    pub fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    pub fn set_winner(&mut self, winner: Player) {
        self.winner = Some(winner);
    }

    pub fn set_tie(&mut self, tie: bool) {
        self.tie = tie;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        let status = GameStatus::default();
        assert!(!status.is_game_over());
        assert_eq!(status.winner(), None);
        assert!(!status.is_tie());
    }

    #[test]
    fn constructor_takes_every_field() {
        let status = GameStatus::new(true, Some(Player::X), true);
        assert!(status.is_game_over());
        assert_eq!(status.winner(), Some(Player::X));
        assert!(status.is_tie());
    }

    #[test]
    fn set_game_over() {
        let mut status = GameStatus::default();
        status.set_game_over(true);
        assert!(status.is_game_over());
        assert_eq!(status.winner(), None);
        assert!(!status.is_tie());
    }

    #[test]
    fn set_winner() {
        let mut status = GameStatus::default();
        status.set_winner(Player::O);
        assert_eq!(status.winner(), Some(Player::O));
        assert!(!status.is_game_over());
    }

    #[test]
    fn set_tie_leaves_game_over_alone() {
        let mut status = GameStatus::default();
        status.set_game_over(true);
        status.set_tie(true);
        assert!(status.is_game_over());
        assert!(status.is_tie());
    }

    #[test]
    fn clearing_game_over_keeps_outcome_unset() {
        let mut status = GameStatus::default();
        status.set_game_over(false);
        assert_eq!(status.winner(), None);
        assert!(!status.is_tie());
    }
}
