//! Centralised error types used across the crate.

use std::io;

use thiserror::Error;

use crate::core::{color::ColorError, events::ParseEventError};

/// Precise configuration faults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one range limit must be configured")]
    EmptyRangeLimits,
    #[error("range limits must be at least 1")]
    ZeroRangeLimit,
    #[error("range limit {limit} exceeds max power {max}")]
    LimitAboveMax { limit: u32, max: u32 },
    #[error("initial range limit {limit} is not one of the selectable limits")]
    InitialLimitNotSelectable { limit: u32 },
    #[error("warning threshold {threshold} must lie in 1..={max}")]
    ThresholdOutOfRange { threshold: u32, max: u32 },
    #[error("max power {max} exceeds the hard cap {cap}; confirm explicitly to go beyond it")]
    HardCapExceeded { max: u32, cap: u32 },
    #[error("{digits} output digits requested, at most {max} are supported")]
    DigitsOutOfRange { digits: u32, max: u32 },
    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Failures of the accumulator itself.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("term count must be at least 1, got {requested}")]
    InvalidTermCount { requested: u32 },
    #[error("superseded by a newer request after {reached} terms")]
    Superseded { reached: u32 },
}

/// Rejections at the controller boundary.  State is untouched whenever one
/// of these is returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error("term count must be a positive integer, got {requested}")]
    InvalidTermCount { requested: f64 },
    #[error("range limit {requested} is not supported (choose one of {supported:?})")]
    RangeLimitNotSupported { requested: u32, supported: Vec<u32> },
    #[error("superseded by a newer request after {reached} terms")]
    Superseded { reached: u32 },
}

impl From<SeriesError> for ControllerError {
    fn from(e: SeriesError) -> Self {
        match e {
            SeriesError::InvalidTermCount { requested } => Self::InvalidTermCount {
                requested: f64::from(requested),
            },
            SeriesError::Superseded { reached } => Self::Superseded { reached },
        }
    }
}

/// Top-level error type bubbled up to the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Events(#[from] ParseEventError),
    #[error("session worker stopped unexpectedly")]
    WorkerDisconnected,
}
