use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::mediator::{BoxResponse, Next, PipelineBehavior, RequestContext, RequestInfo};

/// Warns about requests slower than `threshold`.
pub struct PerformanceBehavior {
    threshold: Duration,
}

impl PerformanceBehavior {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl PipelineBehavior for PerformanceBehavior {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError> {
        let started = Instant::now();
        let result = next.run(request, ctx).await;
        let elapsed = started.elapsed();

        if elapsed > self.threshold {
            warn!(
                request = ?request.to_json(),
                actor = %ctx.actor,
                "Long running request: {} ({} ms)",
                request.name,
                elapsed.as_millis()
            );
        } else {
            debug!("{} took {} ms", request.name, elapsed.as_millis());
        }

        result
    }
}
