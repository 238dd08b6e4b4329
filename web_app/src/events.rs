//! Typed change notifications scoped to the app instance.
//!
//! Mutating actions bump a version counter; the dashboard and the list
//! pages track the counters they care about and re-fetch when one moves.
//! This replaces ad hoc named events on a global dispatch target.

use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ListChanges {
    devices: RwSignal<u64>,
    teleop_groups: RwSignal<u64>,
}

impl ListChanges {
    pub fn new() -> Self {
        Self {
            devices: RwSignal::new(0),
            teleop_groups: RwSignal::new(0),
        }
    }

    /// Broadcast after any successful device create/update/delete.
    pub fn device_list_changed(&self) {
        self.devices.update(|v| *v += 1);
    }

    /// Broadcast after any successful teleop-group create/update/delete.
    pub fn teleop_group_list_changed(&self) {
        self.teleop_groups.update(|v| *v += 1);
    }

    /// Subscribe the current reactive scope to device list changes.
    pub fn track_devices(&self) {
        self.devices.track();
    }

    /// Subscribe the current reactive scope to teleop-group list changes.
    pub fn track_teleop_groups(&self) {
        self.teleop_groups.track();
    }
}
