//! Upstream Transport Port
//!
//! A single lookup-by-id call against a user or product service, with the
//! outcome already classified. Transports never raise: network errors are
//! reported as [`UpstreamResponse::Unavailable`].

use crate::value_objects::{EntityKind, RequestContext};
use async_trait::async_trait;
use uuid::Uuid;

/// Classified response of one upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamResponse {
    /// 200: the entity payload as JSON
    Found(String),
    /// 404: valid negative answer
    NotFound,
    /// 400: the request itself is wrong
    BadRequest(String),
    /// Network error, 5xx or any other unexpected status
    Unavailable(String),
}

/// Upstream transport port
///
/// Implementations must be idempotent and side-effect free so the policy
/// engine can retry them.
#[async_trait]
pub trait UpstreamTransport: Send + Sync + std::fmt::Debug {
    /// Fetch one entity by id, forwarding the caller's context
    async fn fetch(&self, kind: EntityKind, id: Uuid, ctx: &RequestContext) -> UpstreamResponse;

    /// Name of the upstream, used in logs and errors
    fn upstream_name(&self) -> &str;
}
