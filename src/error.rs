use std::error::Error;
use std::fmt;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, BallisticsError>;

// Error type for kernel operations
#[derive(Debug, Clone, PartialEq)]
pub enum BallisticsError {
    /// A scalar input is out of range or not finite. Raised before any integration step runs.
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Dispersion analysis was requested on too few impact points.
    InsufficientData {
        required: usize,
        actual: usize,
    },
}

impl BallisticsError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        BallisticsError::InvalidParameter { name, value, reason }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, BallisticsError::InvalidParameter { .. })
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, BallisticsError::InsufficientData { .. })
    }
}

impl fmt::Display for BallisticsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BallisticsError::InvalidParameter { name, value, reason } => {
                write!(f, "invalid parameter `{}` = {}: {}", name, value, reason)
            }
            BallisticsError::InsufficientData { required, actual } => {
                write!(
                    f,
                    "insufficient data: dispersion needs at least {} impact points, got {}",
                    required, actual
                )
            }
        }
    }
}

impl Error for BallisticsError {}

/// Reject NaN and infinities for a named input.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BallisticsError::invalid(name, value, "must be a finite number"))
    }
}
