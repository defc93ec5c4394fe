use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bevy::log::debug;
use bevy::prelude::{Deref, DerefMut, Resource};
use crossbeam_channel::{Receiver, Sender};

use crate::error::ClientError;
use crate::protocol::Command;

use super::{OnDisconnect, OnReadError, OnResponse};

/// Shared flag telling a reader thread its link is gone.
#[derive(Clone, Default, Debug)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Writing half of the open serial link.
///
/// Dropping it raises the reader's [`StopSignal`], so the reader releases its
/// handle on the next read timeout and the port closes.
#[derive(Resource)]
pub struct SerialLink {
    port_name: String,
    writer: Mutex<Box<dyn Write + Send>>,
    stop: StopSignal,
}

impl SerialLink {
    pub fn new(port_name: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            port_name: port_name.into(),
            writer: Mutex::new(writer),
            stop: StopSignal::default(),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Signal raised when this link is dropped.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Writes one command followed by the line terminator.
    pub fn send(&self, command: &Command) -> Result<(), ClientError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ClientError::LinkUnavailable)?;
        writeln!(writer, "{command}")?;
        writer.flush()?;
        debug!("-> {command}");
        Ok(())
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.stop.raise();
    }
}

/// Sending sides handed to every reader thread.
#[derive(Resource, Clone)]
pub struct ReaderChannels {
    pub on_response: Sender<OnResponse>,
    pub on_read_error: Sender<OnReadError>,
    pub on_disconnect: Sender<OnDisconnect>,
}

/// Wrapper for receiving events from the reader thread
#[derive(Resource, Deref, DerefMut)]
pub struct EventQueue<T: Send + Sync>(pub Mutex<Receiver<T>>);
