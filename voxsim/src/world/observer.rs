//! Synchronous listeners of world events.

use crossbeam_channel::Sender;

use super::Event;


/// An observer is notified of every event pushed in the world, synchronously and in the
/// order of the changes. Observers must not assume anything about the thread that owns
/// the world, so they must be sendable.
pub trait WorldObserver: Send {

    /// Called after a change has been committed to the world.
    fn notify(&mut self, event: &Event);

}

/// An observer forwarding every event to a channel, events are dropped once the
/// receiver has been disconnected.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<Event>,
    /// Set when the receiver has been disconnected.
    closed: bool,
}

impl ChannelObserver {

    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender, closed: false }
    }

    /// Return true if the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

}

impl WorldObserver for ChannelObserver {

    fn notify(&mut self, event: &Event) {
        if !self.closed && self.sender.send(event.clone()).is_err() {
            self.closed = true;
        }
    }

}

impl<F> WorldObserver for F
where
    F: FnMut(&Event) + Send,
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}
