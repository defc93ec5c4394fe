mod events;
#[macro_use]
mod macros;
mod resources;
mod systems;

use std::io::{self, BufRead, BufReader, Read};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bevy::log::{debug, info, warn};
use bevy::prelude::*;

use crate::error::ClientError;
use crate::protocol::Response;
use crate::resources::{Notices, Session};
use crate::{AppState, ClientConfig};

pub use events::*;
pub use resources::*;
pub use systems::*;

/// Port reads give up after this long so the reader can notice a closed app.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Serial transport: reader thread plumbing, response handling and the
/// session/notice resources it mutates.
pub struct SerialLinkPlugin;

impl Plugin for SerialLinkPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>();
        app.init_resource::<ClientConfig>();
        app.init_resource::<Session>();
        app.init_resource::<Notices>();

        let channels = serial_reader_channels!(app, OnResponse, OnReadError, OnDisconnect);
        app.insert_resource(channels);

        systems::setup_systems(app);
    }
}

/// Opens `port_name` and starts its reader thread.
pub fn open_link(
    port_name: &str,
    baud: u32,
    channels: &ReaderChannels,
) -> Result<SerialLink, ClientError> {
    let port = serialport::new(port_name, baud)
        .timeout(READ_TIMEOUT)
        .open()?;
    let reader = port.try_clone()?;
    let link = SerialLink::new(port_name, Box::new(port));
    spawn_reader(port_name, reader, channels.clone(), link.stop_signal())?;
    info!("Opened {port_name} at {baud} baud");
    Ok(link)
}

/// Runs [`pump_lines`] on its own thread, reporting how the link ended.
///
/// A reader stopped through `stop` reports nothing; its link is already gone.
pub fn spawn_reader<R: Read + Send + 'static>(
    port_name: &str,
    reader: R,
    channels: ReaderChannels,
    stop: StopSignal,
) -> io::Result<JoinHandle<()>> {
    let name = port_name.to_owned();
    thread::Builder::new()
        .name(format!("serial-reader {name}"))
        .spawn(move || {
            if let Err(err) = pump_lines(reader, &channels, &stop) {
                warn!("Reading from {name} failed: {err}");
                let _ = channels.on_read_error.send(OnReadError(err));
            }
            if stop.is_raised() {
                debug!("Reader for {name} released its port");
                return;
            }
            debug!("Reader for {name} stopped");
            let _ = channels.on_disconnect.send(OnDisconnect);
        })
}

/// Reads newline terminated responses until end of stream.
///
/// Read timeouts keep any partial line and retry, unless `stop` has been
/// raised. Lines that do not decode are logged and dropped. Returns early,
/// without error, once the app has gone.
pub fn pump_lines<R: Read>(
    reader: R,
    channels: &ReaderChannels,
    stop: &StopSignal,
) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                let text = text.trim();
                if !text.is_empty() {
                    match text.parse::<Response>() {
                        Ok(response) => {
                            debug!("<- {text}");
                            if channels.on_response.send(OnResponse(response)).is_err() {
                                return Ok(());
                            }
                        }
                        Err(err) => warn!("Ignoring server line {text:?}: {err}"),
                    }
                }
                line.clear();
            }
            Err(err) if err.kind() == io::ErrorKind::TimedOut => {
                if stop.is_raised() {
                    return Ok(());
                }
            }
            Err(err) => return Err(err),
        }
    }
}

/// Listens on the EventQueue and writes Bevy events
fn process_network_queue<T: 'static + Send + Sync>(
    maybe_queue: Option<Res<EventQueue<T>>>,
    mut writer: EventWriter<Serial<T>>,
) {
    if let Some(q) = maybe_queue {
        let Ok(queue) = q.lock() else {
            return;
        };
        if !queue.is_empty() {
            writer.write_batch(queue.try_iter().map(Serial));
        }
    }
}
