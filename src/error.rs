//! Error types raised by the calculation core.
use crate::scenario::VehicleType;
use crate::strategy::CostDomain;
use thiserror::Error;

/// Errors that can occur while calculating, comparing or sweeping TCO results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TcoError {
    /// No strategy could be resolved, or a strategy was registered twice.
    ///
    /// This indicates a defect in how strategies were registered and is never retried.
    #[error("No {domain} strategy available for vehicle type {vehicle_type} (implementation: {implementation})")]
    Configuration {
        /// The cost domain being resolved.
        domain: CostDomain,
        /// The vehicle type being resolved.
        vehicle_type: VehicleType,
        /// The implementation variant requested.
        implementation: String,
    },

    /// A strategy key was registered more than once.
    #[error("Duplicate {domain} strategy registered for {key}")]
    DuplicateRegistration {
        /// The cost domain of the duplicate key.
        domain: CostDomain,
        /// Description of the rest of the key.
        key: String,
    },

    /// A scenario parameter is malformed or out of range.
    #[error("Invalid value for {parameter}: {reason}")]
    Validation {
        /// The name of the offending parameter.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A numeric guard failed during calculation.
    #[error("Calculation of {context} failed: {reason}")]
    Computation {
        /// What was being calculated.
        context: String,
        /// Why the calculation failed.
        reason: String,
    },
}

impl TcoError {
    /// Create a [`TcoError::Validation`]
    pub fn validation(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a [`TcoError::Computation`]
    pub fn computation(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Computation {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error signals a registration defect rather than bad input
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::DuplicateRegistration { .. }
        )
    }
}

/// Result type used by the calculation core
pub type TcoResult<T> = Result<T, TcoError>;

/// Return a [`TcoError::Validation`] unless the condition holds
macro_rules! ensure_valid {
    ($cond:expr, $parameter:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::TcoError::validation($parameter, format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_valid;
