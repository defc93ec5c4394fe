use bevy::log::{self, LogPlugin};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;

use tictactoe_serial::{ClientConfig, TicTacToe};

fn main() {
    dotenvy::dotenv().ok();
    let config = ClientConfig::parse();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Tic-Tac-Toe".into(),
                    resolution: WindowResolution::new(400., 520.),
                    resizable: false,
                    ..default()
                }),
                close_when_requested: true,
                ..default()
            })
            .set(LogPlugin {
                filter: config.log_filter().into(),
                level: log::Level::WARN,
                ..default()
            }),
    )
    .insert_resource(ClearColor(Color::BLACK.with_alpha(0.975)))
    .insert_resource(config)
    .add_plugins(TicTacToe);

    app.run();
}
