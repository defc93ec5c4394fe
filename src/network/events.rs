use std::io;

use bevy::prelude::{Deref, DerefMut, Event};

use crate::protocol::Response;

/// Wrapper to help us filter events coming off the serial link
#[derive(Event, Deref, DerefMut)]
pub struct Serial<E>(pub E);

#[derive(Deref, DerefMut)]
pub struct OnResponse(pub Response);

#[derive(Deref, DerefMut)]
pub struct OnReadError(pub io::Error);

/// The reader stopped; nothing more will arrive on this link.
pub struct OnDisconnect;
