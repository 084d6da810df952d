use async_trait::async_trait;
use blocky_domain::{DomainError, Request, Response};
use std::sync::Arc;

/// One element of the resolver chain (§4.1).
///
/// A stage either returns a terminal `Response`, or mutates the request and
/// delegates to an inner resolver it owns (the decorator pattern: each
/// concrete stage wraps `Arc<dyn Resolver>` and calls through it before or
/// after doing its own work). The chain itself is just the outermost
/// `Arc<dyn Resolver>` built by composing stages from the inside out.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, request: Request) -> Result<Response, DomainError>;
}

/// A boxed, shareable chain stage.
pub type Stage = Arc<dyn Resolver>;
