use std::fs;

use tictactoe_serial::protocol::{Command, Response};
use tictactoe_serial::resources::{Notices, Session};
use tictactoe_serial::save::{SavedGame, load_session, save_session};
use tictactoe_serial::{ClientError, Mode, Player};

#[test]
fn saved_game_restores_into_a_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gameState.ini");

    let mut session = Session::new();
    session.select_mode(Mode::AiHard);
    session.click_cell(4);
    session.apply(Response::AiMove { row: 0, col: 0 });
    session.click_cell(8);
    session.snapshot().save_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[Board]"));
    assert!(text.contains("Mode=2"));

    let mut restored = Session::new();
    let commands = restored.restore(&SavedGame::load_from(&path).unwrap());

    assert_eq!(commands, vec![Command::SetMode(Mode::AiHard)]);
    assert_eq!(restored.mode(), Mode::AiHard);
    assert_eq!(restored.turn(), Player::O);
    assert_eq!(restored.snapshot(), session.snapshot());
    assert!(!restored.cell(0).unwrap().enabled);
    assert!(restored.cell(1).unwrap().enabled);
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.ini");

    let err = SavedGame::load_from(&path).unwrap_err();
    assert!(matches!(err, ClientError::SaveNotFound(ref p) if *p == path));
}

#[test]
fn truncated_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gameState.ini");
    fs::write(&path, "[Game]\nTurn=X\nMode=1\n").unwrap();

    let err = SavedGame::load_from(&path).unwrap_err();
    assert!(matches!(err, ClientError::InvalidSave(_)), "{err}");
}

#[test]
fn save_and_load_report_their_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gameState.ini");
    let mut notices = Notices::default();

    let mut restored = Session::new();
    assert!(load_session(&mut restored, &mut notices, &path).is_empty());
    assert_eq!(notices.dismiss().as_deref(), Some("No save file found!"));

    let mut session = Session::new();
    session.select_mode(Mode::AiEasy);
    session.click_cell(2);
    save_session(&session, &mut notices, &path);
    assert_eq!(notices.dismiss().as_deref(), Some("Game state saved!"));

    let commands = load_session(&mut restored, &mut notices, &path);
    assert_eq!(notices.dismiss().as_deref(), Some("Game state loaded!"));
    assert_eq!(commands, vec![Command::SetMode(Mode::AiEasy)]);
    assert_eq!(restored.snapshot(), session.snapshot());
}

#[test]
fn broken_file_is_reported_as_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gameState.ini");
    fs::write(&path, "[Game]\nTurn=X\n").unwrap();
    let mut notices = Notices::default();

    let mut session = Session::new();
    session.click_cell(0);
    let before = session.snapshot();

    assert!(load_session(&mut session, &mut notices, &path).is_empty());
    assert!(notices.current().unwrap().starts_with("Error loading game: "));
    assert_eq!(session.snapshot(), before);
}
