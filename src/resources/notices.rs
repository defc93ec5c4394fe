use std::collections::VecDeque;

use bevy::prelude::{Res, Resource};

/// Messages waiting to be acknowledged by the user, oldest first.
///
/// While any notice is pending the board and controls ignore input.
#[derive(Resource, Default, Debug)]
pub struct Notices(VecDeque<String>);

impl Notices {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push_back(message.into());
    }

    pub fn current(&self) -> Option<&str> {
        self.0.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) -> Option<String> {
        self.0.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Run condition gating board and control input.
pub fn no_pending_notice(notices: Res<Notices>) -> bool {
    notices.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_are_shown_in_arrival_order() {
        let mut notices = Notices::default();
        assert_eq!(notices.current(), None);

        notices.push("Connected to COM3 successfully.");
        notices.push(String::from("Player X wins!"));
        assert_eq!(notices.len(), 2);
        assert_eq!(notices.current(), Some("Connected to COM3 successfully."));

        notices.dismiss();
        assert_eq!(notices.current(), Some("Player X wins!"));
        notices.dismiss();
        assert!(notices.is_empty());
        assert_eq!(notices.dismiss(), None);
    }
}
