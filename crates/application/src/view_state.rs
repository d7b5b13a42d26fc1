//! Screen state reduction
//!
//! Every screen model reduces its asynchronous results into this one
//! enumeration; the UI renders whatever variant is current.

use std::sync::Arc;

use crate::error::ApplicationError;

/// The state a screen is in
///
/// `Error` carries the original failure; cloning is cheap because the cause
/// is shared. Empty-but-successful answers are `NoResults`, never `Error`.
#[derive(Debug, Clone)]
pub enum ViewState<T> {
    /// Nothing requested yet (or nothing selected)
    Idle,
    /// A request is in flight
    Loading,
    /// The request produced data
    Success(T),
    /// The request succeeded but produced nothing
    NoResults,
    /// The request failed
    Error(Arc<ApplicationError>),
}

impl<T> ViewState<T> {
    /// Wrap a failure
    #[must_use]
    pub fn failed(err: ApplicationError) -> Self {
        Self::Error(Arc::new(err))
    }

    /// Whether this is the `Success` variant
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is the `Error` variant
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The success payload, if any
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The failure cause, if any
    pub fn cause(&self) -> Option<&ApplicationError> {
        match self {
            Self::Error(cause) => Some(cause),
            _ => None,
        }
    }
}

// Errors compare by rendered message; good enough for state assertions.
impl<T: PartialEq> PartialEq for ViewState<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Idle, Self::Idle)
            | (Self::Loading, Self::Loading)
            | (Self::NoResults, Self::NoResults) => true,
            (Self::Success(a), Self::Success(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_exposes_data() {
        let state = ViewState::Success(vec![1, 2, 3]);
        assert!(state.is_success());
        assert_eq!(state.data(), Some(&vec![1, 2, 3]));
        assert!(state.cause().is_none());
    }

    #[test]
    fn failed_wraps_cause() {
        let state: ViewState<Vec<i32>> =
            ViewState::failed(ApplicationError::Network("timeout".to_string()));
        assert!(state.is_error());
        assert!(state.cause().is_some());
        assert!(state.data().is_none());
    }

    #[test]
    fn unit_variants_compare_equal() {
        assert_eq!(ViewState::<i32>::Idle, ViewState::Idle);
        assert_eq!(ViewState::<i32>::Loading, ViewState::Loading);
        assert_eq!(ViewState::<i32>::NoResults, ViewState::NoResults);
        assert_ne!(ViewState::<i32>::Idle, ViewState::Loading);
    }

    #[test]
    fn errors_compare_by_message() {
        let a: ViewState<i32> = ViewState::failed(ApplicationError::Network("x".to_string()));
        let b: ViewState<i32> = ViewState::failed(ApplicationError::Network("x".to_string()));
        let c: ViewState<i32> = ViewState::failed(ApplicationError::Network("y".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
