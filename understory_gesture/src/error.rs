// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Recognition failure is not an error: a recognizer that rejects an
//! interaction reports [`GesturePhase::Failed`](crate::GesturePhase::Failed).
//! The errors here are integration problems the caller must hear about.

use core::fmt;

use crate::GesturePhase;
use crate::host::GestureHandle;

/// Errors reported by gestures and the gesture host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GestureError {
    /// An event asked for a phase transition outside the legal graph.
    ///
    /// The gesture's value is left untouched when this is returned.
    InvalidTransition {
        /// The phase the gesture was in.
        from: GesturePhase,
        /// The phase the event asked for.
        to: GesturePhase,
    },
    /// A recognizer was constructed with an invalid parameter.
    Configuration(ConfigError),
    /// The handle refers to a gesture that has been detached.
    StaleHandle(GestureHandle),
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                write!(f, "invalid gesture phase transition {from} -> {to}")
            }
            Self::Configuration(err) => write!(f, "invalid gesture configuration: {err}"),
            Self::StaleHandle(handle) => write!(f, "gesture handle {handle:?} is detached"),
        }
    }
}

impl core::error::Error for GestureError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for GestureError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err)
    }
}

/// A recognizer parameter that was rejected at construction time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The required tap count was zero.
    ZeroTapCount,
    /// A duration parameter was zero.
    NonPositiveDuration {
        /// The parameter name, e.g. `"minimum_duration"`.
        parameter: &'static str,
    },
    /// A distance parameter was zero, negative or NaN.
    NonPositiveDistance {
        /// The parameter name, e.g. `"maximum_distance"`.
        parameter: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTapCount => f.write_str("required_tap_count must be at least 1"),
            Self::NonPositiveDuration { parameter } => {
                write!(f, "{parameter} must be a positive duration")
            }
            Self::NonPositiveDistance { parameter } => {
                write!(f, "{parameter} must be a positive distance")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Rejects zero, negative and NaN distances. Infinity is allowed.
pub(crate) fn positive_distance(value: f64, parameter: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDistance { parameter })
    }
}

pub(crate) fn positive_duration(
    value: core::time::Duration,
    parameter: &'static str,
) -> Result<(), ConfigError> {
    if value.is_zero() {
        Err(ConfigError::NonPositiveDuration { parameter })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::time::Duration;

    #[test]
    fn display_names_the_edge() {
        let err = GestureError::InvalidTransition {
            from: GesturePhase::None,
            to: GesturePhase::Ended,
        };
        assert_eq!(err.to_string(), "invalid gesture phase transition none -> ended");
    }

    #[test]
    fn configuration_error_is_the_source() {
        use core::error::Error as _;

        let err = GestureError::from(ConfigError::ZeroTapCount);
        assert!(err.source().is_some(), "config errors expose their cause");
        assert_eq!(
            err.to_string(),
            "invalid gesture configuration: required_tap_count must be at least 1"
        );
    }

    #[test]
    fn distance_validation_rejects_nan_and_zero() {
        assert!(positive_distance(1.0, "d").is_ok());
        assert!(positive_distance(f64::INFINITY, "d").is_ok());
        assert_eq!(
            positive_distance(0.0, "d"),
            Err(ConfigError::NonPositiveDistance { parameter: "d" })
        );
        assert!(positive_distance(-3.0, "d").is_err());
        assert!(positive_distance(f64::NAN, "d").is_err());
    }

    #[test]
    fn duration_validation_rejects_zero() {
        assert!(positive_duration(Duration::from_millis(1), "t").is_ok());
        assert!(positive_duration(Duration::ZERO, "t").is_err());
    }
}
