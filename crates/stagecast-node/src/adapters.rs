//! # Collaborator Adapters
//!
//! Logging stand-ins for the rendering and signaling collaborators. The
//! real surfaces (fullscreen image windows, LED strips) live outside this
//! workspace and plug in through the same ports.

use tracing::info;

use stagecast_types::{DisplayContent, SignalCommand};

use crate::ports::{DisplaySink, SignalSink, SinkError};

/// Logs what the rendering surface would show.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDisplay;

impl DisplaySink for LoggingDisplay {
    fn render(&self, content: &DisplayContent) -> Result<(), SinkError> {
        match content {
            DisplayContent::Empty => info!("display: (empty)"),
            DisplayContent::Text { content } => info!(text = %content, "display: text"),
            DisplayContent::Image { path } => info!(image = %path, "display: image"),
            DisplayContent::ImageWithText { image, text } => {
                info!(image = %image, text = %text, "display: image with text");
            }
        }
        Ok(())
    }
}

/// Logs the signal the hardware would animate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSignal;

impl SignalSink for LoggingSignal {
    fn notify(&self, signal: &SignalCommand) -> Result<(), SinkError> {
        info!(
            source = %signal.source,
            target = %signal.target,
            reverse = signal.reverse,
            "signal"
        );
        Ok(())
    }
}
