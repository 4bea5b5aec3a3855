use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::audit::AuditEntry;
use crate::error::AppError;
use crate::mediator::{
    BoxResponse, Next, PipelineBehavior, RequestContext, RequestInfo, RequestKind,
};
use crate::store::Repository;

/// Records every command, successful or not, in the audit trail.
/// A failing audit write is logged and never fails the command.
pub struct AuditBehavior {
    trail: Arc<dyn Repository<AuditEntry>>,
}

impl AuditBehavior {
    pub fn new(trail: Arc<dyn Repository<AuditEntry>>) -> Self {
        Self { trail }
    }
}

#[async_trait]
impl PipelineBehavior for AuditBehavior {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError> {
        if request.kind != RequestKind::Command {
            return next.run(request, ctx).await;
        }

        let result = next.run(request, ctx).await;

        let entry = AuditEntry::record(request, ctx, &result);
        if let Err(e) = self.trail.insert(entry).await {
            warn!(
                correlation_id = %ctx.correlation_id,
                "Failed to write audit entry for {}: {}", request.name, e
            );
        }

        result
    }
}
