//! Request-scoped principal binding.
//!
//! Exposes "the current principal" without threading it through every
//! call. The binding is keyed per tokio task, so concurrent requests
//! never observe each other's principal, and it is released when the
//! scope exits — on normal return, error, panic, or cancellation alike.

use std::future::Future;

use crate::models::principal::Principal;

tokio::task_local! {
    static CURRENT_PRINCIPAL: Principal;
}

/// Accessor for the per-request principal binding.
///
/// There is deliberately no unscoped `set`/`clear` pair: acquisition and
/// release are a single scoped operation, so a stale principal can never
/// leak into a reused worker.
pub struct RequestContext;

impl RequestContext {
    /// Runs `fut` with `principal` bound as the current principal.
    ///
    /// Called once at the start of request handling, wrapping the whole
    /// request future.
    pub async fn scope<F>(principal: Principal, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_PRINCIPAL.scope(principal, fut).await
    }

    /// Synchronous variant of [`RequestContext::scope`].
    pub fn sync_scope<F, R>(principal: Principal, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_PRINCIPAL.sync_scope(principal, f)
    }

    /// The principal bound to the calling task, or the anonymous
    /// principal when none is bound. Never fails.
    pub fn current() -> Principal {
        CURRENT_PRINCIPAL
            .try_with(Clone::clone)
            .unwrap_or_else(|_| Principal::anonymous())
    }
}
