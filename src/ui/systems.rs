use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::log::{info, warn};
use bevy::prelude::*;
use bevy::ui::{FocusPolicy, GlobalZIndex};

use crate::network::{ReaderChannels, SerialLink, connect, send_commands};
use crate::resources::{CELL_COUNT, Notices, Session, no_pending_notice};
use crate::save::{load_session, save_session};
use crate::{AppState, ClientConfig, Mode, Player};

use super::{
    AvailablePorts, CELL_SIZE, CellMark, ConnectPortButton, ControlButton, DismissNoticeButton,
    Grid, GridCell, ModeButton, NoticeOverlay, PortPanel, QuitButton, RefreshPortsButton,
    StatLabel, TurnLabel, UiButtonStyle, colors,
};

pub fn setup_systems(app: &mut App) {
    app.init_resource::<AvailablePorts>();
    app.add_systems(Startup, spawn_camera);

    // Port picker
    app.add_systems(
        OnEnter(AppState::PortSelect),
        (refresh_available_ports, port_select_screen, populate_port_panel).chain(),
    );
    app.add_systems(
        Update,
        (
            (connect_port_button_interaction, port_menu_interaction).run_if(no_pending_notice),
            populate_port_panel,
        )
            .chain()
            .run_if(in_state(AppState::PortSelect)),
    );

    // Board
    app.add_systems(
        OnEnter(AppState::Game),
        (game_screen, refresh_board, refresh_controls, refresh_labels).chain(),
    );
    app.add_systems(
        Update,
        (
            (
                grid_cell_interaction,
                mode_button_interaction,
                control_button_interaction,
            )
                .run_if(no_pending_notice),
            (refresh_board, refresh_controls, refresh_labels),
        )
            .chain()
            .run_if(in_state(AppState::Game)),
    );

    // Shared by every screen
    app.add_systems(
        Update,
        (button_hover_style, dismiss_notice_interaction, show_notice).chain(),
    );
}

fn spawn_camera(mut cmds: Commands) {
    cmds.spawn(Camera2d);
}

fn text_bundle(text: impl Into<String>, font_size: f32, color: impl Into<Color>) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color.into()),
    )
}

fn spawn_button(
    parent: &mut ChildSpawnerCommands,
    marker: impl Bundle,
    label: &str,
    style: UiButtonStyle,
    width: Val,
) {
    parent
        .spawn((
            marker,
            Button,
            style,
            Node {
                width,
                height: Val::Px(30.0),
                border: UiRect::all(Val::Px(1.0)),
                margin: UiRect::all(Val::Px(2.0)),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(5.0)),
            BorderColor(style.border_color),
            BackgroundColor(style.color),
        ))
        .with_child(text_bundle(label, 15.0, style.text_color));
}

fn primary_button_style() -> UiButtonStyle {
    UiButtonStyle {
        color: colors::GREEN_YELLOW.into(),
        border_color: colors::DODGER_BLUE.into(),
        text_color: colors::DARK_VIOLET.into(),
    }
}

fn disabled_button_style() -> UiButtonStyle {
    UiButtonStyle {
        color: colors::GRAY.with_alpha(0.5).into(),
        border_color: colors::GRAY.into(),
        text_color: colors::DARK_VIOLET.into(),
    }
}

pub fn refresh_available_ports(mut ports: ResMut<AvailablePorts>, mut notices: ResMut<Notices>) {
    ports.0 = match serialport::available_ports() {
        Ok(found) => found.into_iter().map(|port| port.port_name).collect(),
        Err(err) => {
            warn!("Listing serial ports failed: {err}");
            notices.push(format!("Error listing serial ports: {err}"));
            Vec::new()
        }
    };
    info!("Found {} serial port(s)", ports.len());
}

pub fn port_select_screen(mut cmds: Commands) {
    cmds.spawn((
        StateScoped(AppState::PortSelect),
        Node {
            width: Val::Percent(100.),
            height: Val::Percent(100.),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceAround,
            flex_direction: FlexDirection::Column,
            ..default()
        },
    ))
    .with_children(|parent| {
        parent.spawn((
            Label,
            text_bundle("Tic-Tac-Toe", 25.0, colors::GOLD),
            BoxShadow::new(
                colors::DODGER_BLUE.with_alpha(0.5).into(),
                Val::Px(0.),
                Val::Px(-2.),
                Val::Px(2.),
                Val::Px(20.0),
            ),
        ));
        parent.spawn((
            Label,
            text_bundle("Select a serial port", 16.0, Color::WHITE),
        ));

        parent.spawn((
            PortPanel,
            Node {
                width: Val::Percent(90.),
                height: Val::Percent(55.),
                display: Display::Grid,
                row_gap: Val::Px(2.),
                overflow: Overflow::scroll_y(),
                grid_auto_rows: vec![GridTrack::px(34.)],
                grid_auto_flow: GridAutoFlow::Row,
                align_items: AlignItems::Center,
                justify_items: JustifyItems::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(5.)),
        ));

        parent
            .spawn(Node {
                width: Val::Percent(90.),
                justify_content: JustifyContent::SpaceEvenly,
                ..default()
            })
            .with_children(|menu| {
                spawn_button(
                    menu,
                    RefreshPortsButton,
                    "Refresh",
                    primary_button_style(),
                    Val::Px(90.),
                );
                spawn_button(
                    menu,
                    QuitButton,
                    "Quit",
                    UiButtonStyle {
                        color: colors::GOLD.into(),
                        border_color: colors::DEEP_PINK.into(),
                        text_color: colors::DARK_VIOLET.into(),
                    },
                    Val::Px(90.),
                );
            });
    });
}

pub fn populate_port_panel(
    mut cmds: Commands,
    panel_q: Query<Entity, With<PortPanel>>,
    ports: Res<AvailablePorts>,
) -> Result {
    if !ports.is_changed() {
        return Ok(());
    }
    let panel = panel_q.single()?;

    cmds.entity(panel).despawn_related::<Children>();
    cmds.entity(panel).with_children(|list| {
        if ports.is_empty() {
            list.spawn((Label, text_bundle("No serial ports found", 16.0, colors::GOLD)));
            return;
        }

        for (idx, port_name) in ports.iter().enumerate() {
            let mut connect_style = UiButtonStyle {
                color: colors::GREEN_YELLOW.into(),
                border_color: colors::DEEP_PINK.into(),
                text_color: colors::DARK_VIOLET.into(),
            };
            if idx % 2 != 0 {
                connect_style.color = colors::GOLD.into();
            }

            list.spawn((
                Node {
                    height: Val::Percent(95.),
                    width: Val::Percent(98.),
                    display: Display::Grid,
                    column_gap: Val::Px(2.),
                    overflow: Overflow::clip(),
                    grid_template_columns: vec![
                        RepeatedGridTrack::fr(1, 3.),
                        RepeatedGridTrack::fr(1, 2.),
                    ],
                    align_items: AlignItems::Center,
                    justify_items: JustifyItems::Center,
                    border: UiRect::bottom(Val::Px(2.)),
                    ..default()
                },
                BorderColor(colors::DODGER_BLUE.with_alpha(0.2).into()),
            ))
            .with_children(|row| {
                row.spawn((Label, text_bundle(port_name.clone(), 16.0, colors::GOLD)));
                spawn_button(
                    row,
                    ConnectPortButton(port_name.clone()),
                    "Connect",
                    connect_style,
                    Val::Px(80.),
                );
            });
        }
    });
    Ok(())
}

pub fn connect_port_button_interaction(
    mut cmds: Commands,
    interaction_query: Query<(&ConnectPortButton, &Interaction), Changed<Interaction>>,
    config: Res<ClientConfig>,
    channels: Res<ReaderChannels>,
    session: Res<Session>,
    mut notices: ResMut<Notices>,
    mut app_state: ResMut<NextState<AppState>>,
) {
    for (button, interaction) in &interaction_query {
        if *interaction == Interaction::Pressed {
            connect(
                &mut cmds,
                &button.0,
                &config,
                &channels,
                &session,
                &mut notices,
                &mut app_state,
            );
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn port_menu_interaction(
    refresh_q: Query<&Interaction, (Changed<Interaction>, With<RefreshPortsButton>)>,
    quit_q: Query<&Interaction, (Changed<Interaction>, With<QuitButton>)>,
    ports: ResMut<AvailablePorts>,
    notices: ResMut<Notices>,
    mut exit: EventWriter<AppExit>,
) {
    if quit_q.iter().any(|i| *i == Interaction::Pressed) {
        exit.write(AppExit::Success);
        return;
    }
    if refresh_q.iter().any(|i| *i == Interaction::Pressed) {
        refresh_available_ports(ports, notices);
    }
}

pub fn game_screen(mut cmds: Commands) {
    cmds.spawn((
        StateScoped(AppState::Game),
        Node {
            width: Val::Percent(100.),
            height: Val::Percent(100.),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceEvenly,
            flex_direction: FlexDirection::Column,
            ..default()
        },
    ))
    .with_children(|parent| {
        parent.spawn((
            TurnLabel,
            Label,
            text_bundle("X's Turn.", 20.0, colors::GOLD),
        ));

        parent
            .spawn(Node {
                width: Val::Percent(96.),
                justify_content: JustifyContent::SpaceEvenly,
                ..default()
            })
            .with_children(|modes| {
                for mode in Mode::ALL {
                    spawn_button(
                        modes,
                        ModeButton(mode),
                        mode.label(),
                        primary_button_style(),
                        Val::Px(88.),
                    );
                }
            });

        parent
            .spawn((
                Grid,
                Node {
                    width: Val::Px(CELL_SIZE * 3. + 2.),
                    height: Val::Px(CELL_SIZE * 3. + 2.),
                    align_items: AlignItems::Center,
                    justify_items: JustifyItems::Center,
                    row_gap: Val::Px(1.),
                    column_gap: Val::Px(1.),
                    display: Display::Grid,
                    grid_template_rows: vec![RepeatedGridTrack::px(3, CELL_SIZE)],
                    grid_template_columns: vec![RepeatedGridTrack::px(3, CELL_SIZE)],
                    ..default()
                },
                BoxShadow::new(
                    colors::GREEN_YELLOW.with_alpha(0.5).into(),
                    Val::Px(0.),
                    Val::Px(-2.),
                    Val::Px(2.),
                    Val::Px(10.0),
                ),
            ))
            .with_children(|grid| {
                for idx in 0..CELL_COUNT {
                    grid.spawn((
                        GridCell(idx),
                        Button,
                        Node {
                            width: Val::Px(CELL_SIZE),
                            height: Val::Px(CELL_SIZE),
                            border: UiRect::all(Val::Px(2.)),
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                        BorderColor(colors::GREEN_YELLOW.into()),
                        BackgroundColor(colors::DODGER_BLUE.into()),
                        BorderRadius::all(Val::Px(5.)),
                    ))
                    .with_child((CellMark(idx), text_bundle("", 40.0, Color::WHITE)));
                }
            });

        parent
            .spawn(Node {
                width: Val::Percent(90.),
                justify_content: JustifyContent::SpaceEvenly,
                ..default()
            })
            .with_children(|stats| {
                for stat in [StatLabel::WinsX, StatLabel::WinsO, StatLabel::Ties] {
                    stats.spawn((stat, Label, text_bundle("", 16.0, Color::WHITE)));
                }
            });

        parent
            .spawn(Node {
                width: Val::Percent(96.),
                justify_content: JustifyContent::SpaceEvenly,
                ..default()
            })
            .with_children(|controls| {
                for control in ControlButton::ALL {
                    spawn_button(
                        controls,
                        control,
                        control.label(),
                        primary_button_style(),
                        Val::Px(70.),
                    );
                }
            });
    });
}

/// Background, border and text colors of a board cell.
fn cell_colors(mark: Option<Player>, clickable: bool) -> (Color, Color, Color) {
    match mark {
        Some(Player::X) => (
            colors::GOLD.into(),
            colors::GREEN_YELLOW.into(),
            colors::DARK_VIOLET.into(),
        ),
        Some(Player::O) => (
            colors::DEEP_PINK.into(),
            colors::GREEN_YELLOW.into(),
            colors::GREEN_YELLOW.into(),
        ),
        None if clickable => (
            colors::DODGER_BLUE.into(),
            colors::GREEN_YELLOW.into(),
            Color::WHITE,
        ),
        None => (
            colors::DODGER_BLUE.with_alpha(0.35).into(),
            colors::GRAY.into(),
            Color::WHITE,
        ),
    }
}

pub fn grid_cell_interaction(
    mut interaction_query: Query<
        (
            &GridCell,
            &Interaction,
            &mut BackgroundColor,
            &mut BorderColor,
        ),
        (Changed<Interaction>, With<Button>),
    >,
    mut session: ResMut<Session>,
    link: Option<Res<SerialLink>>,
    mut notices: ResMut<Notices>,
) {
    for (cell, interaction, mut color, mut border_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                if let Some(command) = session.click_cell(**cell) {
                    send_commands(link.as_deref(), &[command], &mut notices);
                }
            }
            Interaction::Hovered => {
                if session.can_click(**cell) {
                    *color = colors::GREEN_YELLOW.into();
                    *border_color = colors::DODGER_BLUE.into();
                }
            }
            Interaction::None => {
                let mark = session.cell(**cell).and_then(|c| c.mark);
                let (bg, border, _) = cell_colors(mark, session.can_click(**cell));
                *color = bg.into();
                *border_color = border.into();
            }
        }
    }
}

pub fn mode_button_interaction(
    interaction_query: Query<(&ModeButton, &Interaction), Changed<Interaction>>,
    mut session: ResMut<Session>,
    link: Option<Res<SerialLink>>,
    mut notices: ResMut<Notices>,
) {
    for (ModeButton(mode), interaction) in &interaction_query {
        if *interaction == Interaction::Pressed {
            let commands = session.select_mode(*mode);
            send_commands(link.as_deref(), &commands, &mut notices);
        }
    }
}

pub fn control_button_interaction(
    interaction_query: Query<(&ControlButton, &Interaction), Changed<Interaction>>,
    mut session: ResMut<Session>,
    link: Option<Res<SerialLink>>,
    mut notices: ResMut<Notices>,
    config: Res<ClientConfig>,
) {
    for (control, interaction) in &interaction_query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let commands = match control {
            ControlButton::Start => session.start_ai_vs_ai(),
            ControlButton::Restart => session.restart(),
            ControlButton::New => session.new_game(),
            ControlButton::Save => {
                save_session(&session, &mut notices, &config.save_file);
                Vec::new()
            }
            ControlButton::Load => load_session(&mut session, &mut notices, &config.save_file),
        };
        send_commands(link.as_deref(), &commands, &mut notices);
    }
}

pub fn refresh_board(
    session: Res<Session>,
    mut cells_q: Query<(&GridCell, &mut BackgroundColor, &mut BorderColor)>,
    mut marks_q: Query<(&CellMark, &mut Text, &mut TextColor)>,
) {
    if !session.is_changed() {
        return;
    }
    for (cell, mut color, mut border_color) in &mut cells_q {
        let mark = session.cell(**cell).and_then(|c| c.mark);
        let (bg, border, _) = cell_colors(mark, session.can_click(**cell));
        *color = bg.into();
        *border_color = border.into();
    }
    for (cell, mut text, mut text_color) in &mut marks_q {
        let mark = session.cell(**cell).and_then(|c| c.mark);
        let (_, _, fg) = cell_colors(mark, true);
        *text = mark.map(Player::symbol).unwrap_or_default().into();
        *text_color = fg.into();
    }
}

#[allow(clippy::type_complexity)]
pub fn refresh_controls(
    session: Res<Session>,
    mut mode_q: Query<(
        &ModeButton,
        &mut UiButtonStyle,
        &mut BackgroundColor,
        &mut BorderColor,
    )>,
    mut control_q: Query<
        (
            &ControlButton,
            &mut UiButtonStyle,
            &mut BackgroundColor,
            &mut BorderColor,
        ),
        Without<ModeButton>,
    >,
) {
    if !session.is_changed() {
        return;
    }
    for (ModeButton(mode), mut style, mut color, mut border_color) in &mut mode_q {
        *style = if !session.mode_select_enabled() {
            disabled_button_style()
        } else if *mode == session.mode() {
            UiButtonStyle {
                color: colors::GOLD.into(),
                border_color: colors::DEEP_PINK.into(),
                text_color: colors::DARK_VIOLET.into(),
            }
        } else {
            primary_button_style()
        };
        *color = style.color.into();
        *border_color = style.border_color.into();
    }
    for (control, mut style, mut color, mut border_color) in &mut control_q {
        *style = match control {
            ControlButton::Start if !session.start_enabled() => disabled_button_style(),
            _ => primary_button_style(),
        };
        *color = style.color.into();
        *border_color = style.border_color.into();
    }
}

pub fn refresh_labels(
    session: Res<Session>,
    mut turn_label_q: Query<(&mut Text, &mut TextColor), With<TurnLabel>>,
    mut stats_q: Query<(&StatLabel, &mut Text), Without<TurnLabel>>,
) -> Result {
    if !session.is_changed() {
        return Ok(());
    }
    let (mut turn_label, mut text_color) = turn_label_q.single_mut()?;
    *turn_label = turn_headline(&session).into();
    *text_color = if session.status().is_game_over() {
        Color::WHITE.into()
    } else {
        colors::GOLD.into()
    };

    let stats = session.stats();
    for (stat, mut text) in &mut stats_q {
        *text = match stat {
            StatLabel::WinsX => format!("X wins: {}", stats.wins_x),
            StatLabel::WinsO => format!("O wins: {}", stats.wins_o),
            StatLabel::Ties => format!("Ties: {}", stats.ties),
        }
        .into();
    }
    Ok(())
}

fn turn_headline(session: &Session) -> String {
    let status = session.status();
    if let Some(winner) = status.winner() {
        return format!("Player {winner} wins!");
    }
    if status.is_tie() {
        return "It's a tie!".to_string();
    }
    if session.is_ai_vs_ai_active() {
        return format!("AI vs AI: {}'s move", session.turn());
    }
    match session.mode() {
        Mode::AiVsAi => "Press Start".to_string(),
        mode if mode.is_ai_opponent() && session.turn() == Player::O => {
            "Waiting for AI...".to_string()
        }
        _ => format!("{}'s Turn.", session.turn()),
    }
}

#[allow(clippy::type_complexity)]
pub fn button_hover_style(
    mut interaction_query: Query<
        (
            &UiButtonStyle,
            &Interaction,
            &mut BackgroundColor,
            &mut BorderColor,
            &Children,
        ),
        (Changed<Interaction>, With<Button>),
    >,
    mut text_query: Query<&mut TextColor>,
) {
    for (style, interaction, mut color, mut border_color, children) in &mut interaction_query {
        let Ok(mut text_color) = text_query.get_mut(children[0]) else {
            continue;
        };
        match *interaction {
            Interaction::Pressed => {
                *color = Color::WHITE.into();
                *border_color = style.text_color.into();
            }
            Interaction::Hovered => {
                *color = style.text_color.into();
                *text_color = style.color.into();
                *border_color = Color::WHITE.into();
            }
            Interaction::None => {
                *color = style.color.into();
                *text_color = style.text_color.into();
                *border_color = style.border_color.into();
            }
        }
    }
}

pub fn show_notice(
    mut cmds: Commands,
    notices: Res<Notices>,
    overlay_q: Query<Entity, With<NoticeOverlay>>,
) {
    if !notices.is_changed() {
        return;
    }
    for overlay in &overlay_q {
        cmds.entity(overlay).despawn();
    }
    let Some(message) = notices.current() else {
        return;
    };

    cmds.spawn((
        NoticeOverlay,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.),
            height: Val::Percent(100.),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(20.),
            ..default()
        },
        BackgroundColor(Color::BLACK.with_alpha(0.9)),
        FocusPolicy::Block,
        GlobalZIndex(10),
    ))
    .with_children(|parent| {
        parent.spawn((
            Label,
            text_bundle(message, 20.0, colors::GREEN_YELLOW),
            TextLayout::new_with_justify(JustifyText::Center),
            Node {
                max_width: Val::Percent(85.),
                ..default()
            },
        ));
        spawn_button(
            parent,
            DismissNoticeButton,
            "OK",
            UiButtonStyle {
                color: colors::GOLD.into(),
                border_color: colors::DEEP_PINK.into(),
                text_color: colors::DARK_VIOLET.into(),
            },
            Val::Px(90.),
        );
    });
}

pub fn dismiss_notice_interaction(
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<DismissNoticeButton>)>,
    mut notices: ResMut<Notices>,
) {
    if interaction_query.iter().any(|i| *i == Interaction::Pressed) {
        notices.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Response;

    #[test]
    fn headline_follows_the_game() {
        let mut session = Session::new();
        assert_eq!(turn_headline(&session), "X's Turn.");

        session.click_cell(0);
        assert_eq!(turn_headline(&session), "O's Turn.");

        session.select_mode(Mode::AiEasy);
        session.click_cell(0);
        assert_eq!(turn_headline(&session), "Waiting for AI...");

        session.apply(Response::Winner(Player::X));
        assert_eq!(turn_headline(&session), "Player X wins!");

        session.restart();
        session.apply(Response::Tie);
        assert_eq!(turn_headline(&session), "It's a tie!");
    }

    #[test]
    fn headline_in_ai_vs_ai() {
        let mut session = Session::new();
        session.select_mode(Mode::AiVsAi);
        assert_eq!(turn_headline(&session), "Press Start");

        session.start_ai_vs_ai();
        assert_eq!(turn_headline(&session), "AI vs AI: X's move");
    }

    #[test]
    fn empty_cells_dim_once_unclickable() {
        let (open, _, _) = cell_colors(None, true);
        let (closed, _, _) = cell_colors(None, false);
        assert_ne!(open, closed);
        let (x, _, _) = cell_colors(Some(Player::X), false);
        assert_eq!(x, Color::from(colors::GOLD));
    }
}
