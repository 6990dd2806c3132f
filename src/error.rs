//! Error types for the timer, its configuration store and the platform surfaces.

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::ObserverId;
use crate::renderer::RendererKind;

/// Errors raised by the timer engine and renderer construction.
#[derive(Debug, Error)]
pub enum TimerError {
    /// A caller passed a value the operation can never accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operation needs a running countdown and there is none.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    /// The platform lacks the feature a renderer needs.
    #[error("{surface} timer is unavailable: {reason}")]
    CapabilityUnavailable {
        /// Renderer that could not be built.
        surface: RendererKind,
        /// Human readable cause.
        reason: String,
    },

    /// Renderer selection finished without a single usable renderer.
    #[error("the timer can only be used when the boss bar or action bar renderer is loaded")]
    NoRendererAvailable,

    /// The scheduler could not start the repeating countdown task.
    #[error("failed to schedule the countdown task")]
    Schedule(#[source] std::io::Error),
}

impl TimerError {
    /// Shorthand for [`TimerError::CapabilityUnavailable`].
    pub fn unavailable(surface: RendererKind, reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            surface,
            reason: reason.into(),
        }
    }

    /// Whether this is a missing-capability failure rather than a fatal one.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. })
    }
}

/// Errors while loading or saving a file-backed configuration store.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write config file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors raised while drawing to a platform surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The observer disconnected between audience resolution and delivery.
    #[error("observer {0} is not connected")]
    UnknownObserver(ObserverId),

    /// Writing to the observer's terminal failed.
    #[error("terminal write failed")]
    Io(#[from] std::io::Error),
}
