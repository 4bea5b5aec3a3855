use async_trait::async_trait;
use tracing::{info, info_span, warn, Instrument};

use crate::error::AppError;
use crate::mediator::{BoxResponse, Next, PipelineBehavior, RequestContext, RequestInfo};

pub struct LoggingBehavior;

#[async_trait]
impl PipelineBehavior for LoggingBehavior {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError> {
        let span = info_span!(
            "request",
            request = request.name,
            kind = ?request.kind,
            correlation_id = %ctx.correlation_id,
        );

        async move {
            info!("Handling {} for {}", request.name, ctx.actor);

            let result = next.run(request, ctx).await;
            match &result {
                Ok(_) => info!("Handled {}", request.name),
                Err(e) => warn!("{} failed: {}", request.name, e),
            }

            result
        }
        .instrument(span)
        .await
    }
}
