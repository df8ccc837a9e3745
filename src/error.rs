//! Error types for nested access and concurrent measurement.
//!
//! HTTP failures have no type here: [`get_json`](crate::get_json) returns the
//! client's own error unchanged.

use std::fmt;

/// Errors produced while walking a [`KeyPath`](crate::KeyPath) through a nested map.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AccessError {
    /// The mapping reached at `depth` has no entry named `key`
    MissingKey { key: String, depth: usize },
    /// The value reached at `depth` is not a mapping, so `key` cannot index it
    NotAMapping {
        key: String,
        depth: usize,
        found: &'static str,
    },
    /// The terminal value could not be deserialized into the requested type
    Decode { path: String, message: String },
}

impl AccessError {
    /// The key that could not be resolved, if the failure happened during the walk.
    pub fn key(&self) -> Option<&str> {
        match self {
            AccessError::MissingKey { key, .. } | AccessError::NotAMapping { key, .. } => {
                Some(key.as_str())
            }
            AccessError::Decode { .. } => None,
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::MissingKey { key, depth } => {
                write!(f, "KeyError: '{}' (no such key at depth {})", key, depth)
            }
            AccessError::NotAMapping { key, depth, found } => {
                write!(
                    f,
                    "KeyError: '{}' (value at depth {} is {}, not a mapping)",
                    key, depth, found
                )
            }
            AccessError::Decode { path, message } => {
                write!(f, "value at '{}' has an unexpected shape: {}", path, message)
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Result type for nested access
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors produced while measuring concurrent producer invocations.
///
/// Every invocation runs to completion before one of these is returned; when
/// several fail, the one with the lowest invocation index wins.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimerError<E> {
    /// Producer invocation `index` returned an error
    ProducerFailed { index: usize, source: E },
    /// Producer invocation `index` panicked
    ProducerPanicked { index: usize, panic_message: String },
    /// The spawner dropped invocation `index` before it completed
    Abandoned { index: usize },
}

impl<E> TimerError<E> {
    /// Index of the invocation that failed.
    pub fn index(&self) -> usize {
        match self {
            TimerError::ProducerFailed { index, .. }
            | TimerError::ProducerPanicked { index, .. }
            | TimerError::Abandoned { index } => *index,
        }
    }
}

impl<E: fmt::Display> fmt::Display for TimerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::ProducerFailed { index, source } => {
                write!(f, "Producer invocation #{} failed: {}", index, source)
            }
            TimerError::ProducerPanicked {
                index,
                panic_message,
            } => {
                write!(
                    f,
                    "Producer invocation #{} panicked: {}\n\
                     \n\
                     The remaining invocations were awaited before reporting.",
                    index, panic_message
                )
            }
            TimerError::Abandoned { index } => {
                write!(
                    f,
                    "Producer invocation #{} was dropped by the spawner before completing",
                    index
                )
            }
        }
    }
}

impl<E> std::error::Error for TimerError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TimerError::ProducerFailed { source, .. } => Some(source),
            TimerError::ProducerPanicked { .. } | TimerError::Abandoned { .. } => None,
        }
    }
}

/// Result type for concurrent measurement
pub type TimerResult<T, E> = Result<T, TimerError<E>>;

/// Extract a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
