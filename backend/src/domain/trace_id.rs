//! Correlation identifier threaded through a request's logs and errors.
//!
//! A [`TraceId`] is minted by the tracing middleware for each request and
//! held in task-local storage, so error constructors and log statements can
//! pick it up without passing it through every signature.
//!
//! Task-locals do not cross `tokio::spawn` boundaries. Wrap spawned work in
//! [`TraceId::scope`] to carry the identifier onto the new task.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static ACTIVE_TRACE: TraceId;
}

/// Identifier correlating one request's logs, errors, and response header.
///
/// # Examples
/// ```
/// use wicket_backend::TraceId;
///
/// fn log_failure(detail: &str) {
///     match TraceId::current() {
///         Some(id) => eprintln!("[{id}] {detail}"),
///         None => eprintln!("{detail}"),
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, for callers that carry their own correlation.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The identifier in scope for the running task, when one is set.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE_TRACE.try_with(|id| *id).ok()
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` in scope for its whole duration.
    ///
    /// # Examples
    /// ```
    /// use uuid::Uuid;
    /// use wicket_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::from_uuid(Uuid::nil());
    /// let seen = TraceId::scope(id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE_TRACE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn generated_identifiers_are_distinct() {
        assert_ne!(TraceId::generate(), TraceId::generate());
    }

    #[tokio::test]
    async fn scope_exposes_the_identifier_to_current() {
        let id = TraceId::generate();
        let seen = TraceId::scope(id, async move { TraceId::current() }).await;
        assert_eq!(seen, Some(id));
    }

    #[tokio::test]
    async fn current_is_none_outside_any_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn scopes_nest_innermost_wins() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let (seen_inner, seen_after) = TraceId::scope(outer, async move {
            let seen_inner = TraceId::scope(inner, async { TraceId::current() }).await;
            (seen_inner, TraceId::current())
        })
        .await;
        assert_eq!(seen_inner, Some(inner));
        assert_eq!(seen_after, Some(outer));
    }

    #[test]
    fn display_and_parse_round_trip() {
        let id = TraceId::from_uuid(Uuid::nil());
        let parsed: TraceId = id.to_string().parse().expect("rendered UUID parses");
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_uuid(), &Uuid::nil());
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!("not-a-uuid".parse::<TraceId>().is_err());
    }
}
