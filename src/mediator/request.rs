use serde::Serialize;

use crate::mediator::context::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Changes state; audited.
    Command,
    /// Read-only.
    Query,
}

/// A command or query routed by the [`Mediator`](crate::mediator::Mediator)
/// to exactly one handler.
///
/// Requests are serializable so behaviors can log and audit their payload.
/// Secrets (passwords, raw image bytes) must be marked
/// `#[serde(skip_serializing)]`.
pub trait Request: Serialize + Send + Sync + 'static {
    /// Stable name used in logs and the audit trail.
    const NAME: &'static str;

    const KIND: RequestKind;

    /// Who may send the request.
    const POLICY: Policy = Policy::Anonymous;

    type Response: Send + 'static;
}

/// Implements [`Request`] for a request struct.
///
/// ```ignore
/// request!(CreateBeer => BeerDto, Command, Policy::Admin);
/// ```
#[macro_export]
macro_rules! request {
    ($request:ident => $response:ty, $kind:ident, $policy:expr) => {
        impl $crate::mediator::Request for $request {
            const NAME: &'static str = stringify!($request);
            const KIND: $crate::mediator::RequestKind = $crate::mediator::RequestKind::$kind;
            const POLICY: $crate::mediator::Policy = $policy;
            type Response = $response;
        }
    };
}
