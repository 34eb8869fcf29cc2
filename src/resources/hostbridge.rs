//! Channel from the simulation core to the host.
//!
//! Callbacks ([`HostEvent`]s) are pushed through a `crossbeam-channel`
//! sender. The host keeps the matching receiver; dropping it is how a host
//! goes away. Sends are best effort: a failure is reported to the caller
//! and never panics.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::events::host::HostEvent;
use crate::resources::telemetry::Telemetry;

#[derive(Resource, Default)]
pub struct HostBridge {
    tx: Option<Sender<HostEvent>>,
}

impl HostBridge {
    /// Bridge plus the receiver the host should poll.
    pub fn channel() -> (Self, Receiver<HostEvent>) {
        let (tx, rx) = unbounded::<HostEvent>();
        (HostBridge { tx: Some(tx) }, rx)
    }

    /// Bridge with no host attached. Every notification fails.
    pub fn disconnected() -> Self {
        HostBridge { tx: None }
    }

    pub fn is_connected(&self) -> bool {
        self.tx.is_some()
    }

    /// Send an event. Returns `false` if no host is listening.
    pub fn notify(&self, event: HostEvent) -> bool {
        match &self.tx {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

/// Replace the world's host bridge and return the new receiver. A halted
/// telemetry loop resumes for the new host.
pub fn connect_host(world: &mut World) -> Receiver<HostEvent> {
    let (bridge, rx) = HostBridge::channel();
    world.insert_resource(bridge);
    if let Some(mut telemetry) = world.get_resource_mut::<Telemetry>() {
        telemetry.halted = false;
    }
    rx
}
