use async_trait::async_trait;
use tracing::warn;

use crate::error::AppError;
use crate::mediator::{Actor, BoxResponse, Next, PipelineBehavior, RequestContext, RequestInfo};

/// Rejects requests whose policy the actor does not satisfy.
pub struct AuthorizationBehavior;

#[async_trait]
impl PipelineBehavior for AuthorizationBehavior {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError> {
        if !request.policy.permits(&ctx.actor) {
            warn!(
                "Actor {} is not allowed to send {} (policy {:?})",
                ctx.actor, request.name, request.policy
            );
            return Err(match ctx.actor {
                Actor::Anonymous => AppError::Unauthorized,
                _ => AppError::Forbidden(format!("{} requires {:?} access", request.name, request.policy)),
            });
        }

        next.run(request, ctx).await
    }
}
