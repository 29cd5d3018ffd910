//! Progressive result-state sequences for request-scoped workflows.
//!
//! # Overview
//!
//! A workflow that talks to remote services wants to tell its consumer two
//! things, in order: that work has begun, and how the work ended. This crate
//! models that contract as a cold, finite stream of [`ResultState`] values:
//! exactly one [`ResultState::Loading`] marker followed by exactly one
//! terminal state ([`ResultState::Data`] or [`ResultState::Error`]), after
//! which the stream ends.
//!
//! [`sequence`] wraps a fallible future into such a stream without running
//! it; nothing happens until the consumer polls. [`terminal`] collapses a
//! fully drained sequence back into a plain `Result`.
//!
//! # Example
//!
//! ```
//! use futures::StreamExt;
//! use futures::executor::block_on;
//! use stateflow::{ResultState, sequence};
//!
//! let flow = sequence(async { Ok::<_, String>(42) });
//! let states = block_on(flow.collect::<Vec<_>>());
//! assert_eq!(states, vec![ResultState::loading(), ResultState::data(42)]);
//! ```

use std::future::Future;

use futures_core::Stream;

/// Optional human-readable payload accompanying a successful state.
///
/// Upstream services occasionally attach a message to a successful reply
/// (for example a deprecation notice). Carrying it beside the value keeps
/// the value type clean for consumers that do not care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseInfo {
    message: String,
}

impl ResponseInfo {
    /// Wraps a message into a response info payload.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the carried message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One observable state of a progressive workflow.
///
/// A well-formed sequence is `[Loading, Data]` or `[Loading, Error]`; the
/// constructors on this type build the individual states and [`sequence`]
/// enforces the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultState<T, E> {
    /// Work has begun; no outcome is available yet.
    Loading,
    /// Terminal success carrying the produced value.
    Data {
        /// The value the workflow produced.
        value: T,
        /// Optional informational payload attached by the producer.
        info: Option<ResponseInfo>,
    },
    /// Terminal failure carrying the reason.
    Error {
        /// The error the workflow ended with.
        error: E,
    },
}

impl<T, E> ResultState<T, E> {
    /// Builds the loading marker.
    #[must_use]
    pub const fn loading() -> Self {
        Self::Loading
    }

    /// Builds a terminal success state with no informational payload.
    #[must_use]
    pub const fn data(value: T) -> Self {
        Self::Data { value, info: None }
    }

    /// Builds a terminal success state carrying an informational payload.
    #[must_use]
    pub const fn data_with_info(value: T, info: ResponseInfo) -> Self {
        Self::Data {
            value,
            info: Some(info),
        }
    }

    /// Builds a terminal failure state.
    #[must_use]
    pub const fn error(error: E) -> Self {
        Self::Error { error }
    }

    /// Returns `true` for the loading marker.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns `true` for a terminal success state.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// Returns `true` for a terminal failure state.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns `true` for either terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_loading()
    }
}

/// Wraps a fallible future into a cold two-state sequence.
///
/// The returned stream performs no work until polled. On first poll it
/// yields [`ResultState::Loading`], then drives `work` to completion and
/// yields the matching terminal state. The stream then ends; it cannot be
/// restarted and a fresh call produces an independent sequence.
///
/// Dropping the stream mid-flight drops the future with it; no completion
/// or rollback runs on cancellation.
#[must_use]
pub fn sequence<T, E, F>(work: F) -> impl Stream<Item = ResultState<T, E>>
where
    F: Future<Output = Result<T, E>>,
{
    async_stream::stream! {
        yield ResultState::loading();
        match work.await {
            Ok(value) => yield ResultState::data(value),
            Err(error) => yield ResultState::error(error),
        }
    }
}

/// Collapses a drained sequence into the outcome it carried.
///
/// Returns `Some(Ok(value))` or `Some(Err(error))` when `states` has the
/// well-formed `[Loading, terminal]` shape, discarding any informational
/// payload. Returns `None` when the sequence is malformed (wrong length,
/// missing marker, or a non-terminal second state), which callers should
/// treat as a producer bug.
#[must_use]
pub fn terminal<T, E>(states: Vec<ResultState<T, E>>) -> Option<Result<T, E>> {
    let mut states = states.into_iter();
    match (states.next(), states.next(), states.next()) {
        (Some(ResultState::Loading), Some(ResultState::Data { value, .. }), None) => {
            Some(Ok(value))
        }
        (Some(ResultState::Loading), Some(ResultState::Error { error }), None) => {
            Some(Err(error))
        }
        _ => None,
    }
}
