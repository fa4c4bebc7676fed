//! Lifecycle of an asynchronous request as a single value.

use std::fmt::Display;
use std::future::Future;

/// Where a request currently stands.
///
/// Replaces separate loading/error/data fields that could disagree with each
/// other: exactly one of these holds at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Ready(T),
    /// The last request failed with this message
    Failed(String),
}

impl<T> RequestState<T> {
    /// Runs `request` and captures its outcome.
    pub async fn resolve<F, E>(request: F) -> Self
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match request.await {
            Ok(value) => RequestState::Ready(value),
            Err(e) => RequestState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> RequestState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            RequestState::Idle => RequestState::Idle,
            RequestState::Loading => RequestState::Loading,
            RequestState::Ready(value) => RequestState::Ready(f(value)),
            RequestState::Failed(message) => RequestState::Failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve() {
        let ok: RequestState<u32> = RequestState::resolve(async { Ok::<_, String>(3) }).await;
        assert_eq!(ok.data(), Some(&3));
        assert_eq!(ok.error(), None);

        let failed: RequestState<u32> =
            RequestState::resolve(async { Err::<u32, _>("boom".to_string()) }).await;
        assert_eq!(failed.error(), Some("boom"));
        assert!(!failed.is_loading());
    }

    #[test]
    fn test_map_keeps_variant() {
        assert_eq!(RequestState::Ready(2).map(|v| v * 10), RequestState::Ready(20));
        assert_eq!(
            RequestState::<u32>::Loading.map(|v| v * 10),
            RequestState::Loading
        );
        assert_eq!(RequestState::<u32>::default(), RequestState::Idle);
    }
}
