//! Transient attempt failures
//!
//! An [`AttemptError`] describes why a single attempt produced no observation.
//! The poll engine records it and moves on; it never aborts a poll.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Why one attempt produced no observation
#[derive(Debug)]
pub enum AttemptError<E> {
    /// The action itself failed (transport error, element lookup failure, ...)
    Failed(E),

    /// The action did not finish within the per-attempt timeout
    TimedOut {
        /// Which attempt timed out
        attempt: u32,
        /// The timeout duration that was exceeded
        timeout: Duration,
    },
}

impl<E: fmt::Display> fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Failed(source) => write!(f, "{}", source),
            AttemptError::TimedOut { attempt, timeout } => {
                write!(
                    f,
                    "attempt {} timed out after {}ms",
                    attempt,
                    timeout.as_millis()
                )
            }
        }
    }
}

impl<E: Error + 'static> Error for AttemptError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AttemptError::Failed(source) => Some(source),
            AttemptError::TimedOut { .. } => None,
        }
    }
}

impl<E> AttemptError<E> {
    /// Check if this attempt ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::TimedOut { .. })
    }

    /// Get a reference to the action's error, if the action failed on its own
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            AttemptError::Failed(source) => Some(source),
            AttemptError::TimedOut { .. } => None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_failed_display_passes_through() {
        let err: AttemptError<io::Error> =
            AttemptError::Failed(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));

        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "refused");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_timed_out() {
        let err: AttemptError<io::Error> = AttemptError::TimedOut {
            attempt: 2,
            timeout: Duration::from_millis(250),
        };

        assert!(err.is_timeout());
        assert!(err.source_ref().is_none());
        assert_eq!(err.to_string(), "attempt 2 timed out after 250ms");
    }

}
