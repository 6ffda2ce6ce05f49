//! Tri-state lifecycle of one fetch attempt.

/// What a page observes about its data.
///
/// Every attempt starts at `Loading` and settles exactly once into
/// `Error` or `Ready`. There is no edge between `Error` and `Ready`;
/// a new attempt always goes back through `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// The fetch has not settled yet.
    Loading,
    /// The fetch failed; the message is meant for the user.
    Error(String),
    /// Data is available (possibly empty).
    Ready(T),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Transform the ready payload, keeping `Loading`/`Error` as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Error(message) => LoadState::Error(message),
            Self::Ready(data) => LoadState::Ready(f(data)),
        }
    }
}
