pub mod colors;
mod systems;

use bevy::prelude::*;

use crate::Mode;

pub use systems::*;

#[derive(Resource, Default, Deref)]
pub struct AvailablePorts(pub Vec<String>);

#[derive(Component)]
pub struct PortPanel;

#[derive(Component)]
pub struct ConnectPortButton(pub String);

#[derive(Component)]
pub struct RefreshPortsButton;

#[derive(Component)]
pub struct QuitButton;

#[derive(Component, Clone, Copy)]
pub struct UiButtonStyle {
    pub color: Color,
    pub border_color: Color,
    pub text_color: Color,
}

#[derive(Component)]
pub struct TurnLabel;

#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatLabel {
    WinsX,
    WinsO,
    Ties,
}

#[derive(Component)]
pub struct ModeButton(pub Mode);

#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControlButton {
    Start,
    Restart,
    New,
    Save,
    Load,
}

impl ControlButton {
    const ALL: [ControlButton; 5] = [
        ControlButton::Start,
        ControlButton::Restart,
        ControlButton::New,
        ControlButton::Save,
        ControlButton::Load,
    ];

    fn label(self) -> &'static str {
        match self {
            ControlButton::Start => "Start",
            ControlButton::Restart => "Restart",
            ControlButton::New => "New",
            ControlButton::Save => "Save",
            ControlButton::Load => "Load",
        }
    }
}

const CELL_SIZE: f32 = 70.;

#[derive(Component)]
pub struct Grid;

/// Board index of a cell button (row-major, 0..9).
#[derive(Component, Deref)]
pub struct GridCell(pub usize);

/// Text child of a cell button showing its mark.
#[derive(Component, Deref)]
pub struct CellMark(pub usize);

#[derive(Component)]
pub struct NoticeOverlay;

#[derive(Component)]
pub struct DismissNoticeButton;
