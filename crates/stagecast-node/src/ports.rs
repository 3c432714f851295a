//! # Collaborator Ports
//!
//! The rendering surface and the signaling hardware are external
//! collaborators; the runtime consumes them through these traits and
//! treats their failures as log-and-continue events.

use thiserror::Error;

use stagecast_types::{DisplayContent, Role, SignalCommand};

/// A collaborator call that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The rendering surface rejected the content.
    #[error("rendering failed: {0}")]
    Render(String),
    /// The signaling hardware could not be reached.
    #[error("signaling failed: {0}")]
    Signal(String),
}

/// The rendering surface consumed by every node.
pub trait DisplaySink: Send + Sync {
    /// Show the resolved content.
    fn render(&self, content: &DisplayContent) -> Result<(), SinkError>;

    /// Path of the image a role shows when nothing is authored for it.
    fn default_display(&self, role: Role) -> String {
        role.default_image()
    }
}

/// The directional signaling hardware, fire-and-forget.
pub trait SignalSink: Send + Sync {
    /// Animate a signal between two devices.
    fn notify(&self, signal: &SignalCommand) -> Result<(), SinkError>;
}
