//! Lifecycle monitor: evicts behavior instances when the host destroys
//! their objects.

use crate::instances::InstanceTable;
use splice_core::{Extensible, HostError, HostId};
use std::cell::RefCell;
use std::rc::Weak;

/// Subscribe `host` to its destruction event.
///
/// The callback holds only a weak reference to the table and evicts inside
/// the notification. Destruction of an identity that is no longer registered
/// does nothing.
pub fn watch<H: Extensible + ?Sized>(
    host: &H,
    instances: Weak<RefCell<InstanceTable>>,
) -> Result<(), HostError> {
    host.subscribe_destroyed(Box::new(move |id| evict(&instances, id)))
}

fn evict(instances: &Weak<RefCell<InstanceTable>>, id: HostId) {
    let Some(instances) = instances.upgrade() else {
        return;
    };
    // Bind the removed handle so the behavior drops after the borrow ends
    let removed = instances.borrow_mut().evict(id);
    if removed.is_some() {
        tracing::debug!(host = %id, "evicted behavior instance");
    } else {
        tracing::trace!(host = %id, "destruction for unregistered identity");
    }
}
