//! Event and message types.
//!
//! - [`combat`] – damage events observed by the combat resolver
//! - [`host`] – commands from the host, replies and callbacks to it
//! - [`visual`] – presentation commands drained by the renderer

pub mod combat;
pub mod host;
pub mod visual;
