//! World streaming events fanned out to external collaborators.

use crossbeam_channel::{bounded, Receiver, Sender};

/// Notifications emitted by the streaming controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    /// The first streaming cycle ever completed. Fires exactly once per
    /// controller, however many cycles run.
    WorldCreated,
    /// A streaming cycle completed and its regions are presented.
    RegionBatchReady {
        /// Number of regions whose voxel data was created this cycle
        created: usize,
    },
}

/// Bounded event bus broadcasting [`WorldEvent`]s.
#[derive(Debug)]
pub struct WorldEventBus {
    sender: Sender<WorldEvent>,
    receiver: Receiver<WorldEvent>,
    capacity: usize,
}

impl Default for WorldEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl WorldEventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. Non-blocking: if the bus is full the event
    /// is dropped.
    pub fn publish(&self, event: WorldEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// The channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
