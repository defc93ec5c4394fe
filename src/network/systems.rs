use bevy::log::{debug, info, warn};
use bevy::prelude::*;

use crate::protocol::Command;
use crate::resources::{Notices, Session};
use crate::{AppState, ClientConfig};

use super::{OnDisconnect, OnReadError, OnResponse, ReaderChannels, Serial, SerialLink};

pub fn setup_systems(app: &mut App) {
    app.add_systems(Startup, connect_configured_port);

    app.add_systems(
        Update,
        (
            on_response.run_if(on_event::<Serial<OnResponse>>),
            on_read_error.run_if(on_event::<Serial<OnReadError>>),
            on_disconnect.run_if(on_event::<Serial<OnDisconnect>>),
        )
            .chain(),
    );

    app.add_systems(Last, close_link_on_exit.run_if(on_event::<AppExit>));
}

/// Opens the link, tells the server which mode is selected and moves on to the board.
///
/// Failures end up as a notice and leave the app where it was.
pub fn connect(
    cmds: &mut Commands,
    port_name: &str,
    config: &ClientConfig,
    channels: &ReaderChannels,
    session: &Session,
    notices: &mut Notices,
    app_state: &mut NextState<AppState>,
) -> bool {
    match super::open_link(port_name, config.baud, channels) {
        Ok(link) => {
            notices.push(format!("Connected to {port_name} successfully."));
            send_commands(Some(&link), &session.open_commands(), notices);
            cmds.insert_resource(link);
            app_state.set(AppState::Game);
            true
        }
        Err(err) => {
            warn!("Could not open {port_name}: {err}");
            notices.push(format!("Error connecting to {port_name}: {err}"));
            false
        }
    }
}

/// Writes `commands` in order, stopping at the first failure.
///
/// Without an open link the commands are dropped.
pub fn send_commands(link: Option<&SerialLink>, commands: &[Command], notices: &mut Notices) {
    let Some(link) = link else {
        if !commands.is_empty() {
            debug!("No serial link, dropping {} command(s)", commands.len());
        }
        return;
    };
    for command in commands {
        if let Err(err) = link.send(command) {
            warn!("Sending '{command}' on {} failed: {err}", link.port_name());
            notices.push(format!("Error sending command: {err}"));
            return;
        }
    }
}

fn connect_configured_port(
    mut cmds: Commands,
    config: Res<ClientConfig>,
    channels: Res<ReaderChannels>,
    session: Res<Session>,
    mut notices: ResMut<Notices>,
    mut app_state: ResMut<NextState<AppState>>,
) {
    let Some(port_name) = config.port.as_deref() else {
        return;
    };
    connect(
        &mut cmds,
        port_name,
        &config,
        &channels,
        &session,
        &mut notices,
        &mut app_state,
    );
}

pub fn on_response(
    mut responses: EventReader<Serial<OnResponse>>,
    mut session: ResMut<Session>,
    mut notices: ResMut<Notices>,
) {
    for Serial(OnResponse(response)) in responses.read() {
        if let Some(notice) = session.apply(*response) {
            info!("{notice}");
            notices.push(notice);
        }
    }
}

pub fn on_read_error(mut errors: EventReader<Serial<OnReadError>>, mut notices: ResMut<Notices>) {
    for Serial(OnReadError(err)) in errors.read() {
        notices.push(format!("Error receiving data: {err}"));
    }
}

/// The reader is gone, so drop the writer too and let the user pick a port again.
pub fn on_disconnect(
    mut cmds: Commands,
    mut disconnects: EventReader<Serial<OnDisconnect>>,
    link: Option<Res<SerialLink>>,
    mut app_state: ResMut<NextState<AppState>>,
) {
    disconnects.clear();
    let Some(link) = link else {
        return;
    };
    warn!("Serial link on {} closed", link.port_name());
    cmds.remove_resource::<SerialLink>();
    app_state.set(AppState::PortSelect);
}

fn close_link_on_exit(mut cmds: Commands, link: Option<Res<SerialLink>>) {
    if let Some(link) = link {
        info!("Closing {}", link.port_name());
        cmds.remove_resource::<SerialLink>();
    }
}
