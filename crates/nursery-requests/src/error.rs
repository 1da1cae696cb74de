//! Error primitives for request coordination.

use thiserror::Error;

/// Returned to a caller that stopped waiting on a coordinated request.
///
/// The underlying operation keeps running for any other joined callers; only
/// the abandoning caller observes this value (converted into its own error type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request abandoned by caller")]
pub struct Abandoned;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abandoned_renders_message() {
        assert_eq!(Abandoned.to_string(), "request abandoned by caller");
    }
}
