//! Change notifications flowing from the producers to the watch loop.

/// Where a change notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// The watched file's modification timestamp differed from the stored one.
    Timestamp,
    /// The reload command was read from the input stream.
    ReloadCommand,
}

/// A "something changed now" signal. Carries nothing but its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    origin: ChangeOrigin,
}

impl ChangeEvent {
    /// Event raised by a timestamp edge.
    pub fn timestamp() -> Self {
        Self {
            origin: ChangeOrigin::Timestamp,
        }
    }

    /// Event raised by the reload command.
    pub fn reload_command() -> Self {
        Self {
            origin: ChangeOrigin::ReloadCommand,
        }
    }

    /// Origin of this event.
    pub fn origin(&self) -> ChangeOrigin {
        self.origin
    }
}
