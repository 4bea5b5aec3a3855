use async_trait::async_trait;
use std::sync::Arc;

use crate::audit::filtering::AuditFilter;
use crate::audit::models::{AuditEntry, AuditEntryDto};
use crate::audit::requests::GetAuditEntries;
use crate::error::AppError;
use crate::filtering::{ListFilter, PagedList};
use crate::mediator::{RequestContext, RequestHandler};
use crate::store::Repository;

pub struct AuditHandlers {
    trail: Arc<dyn Repository<AuditEntry>>,
}

impl AuditHandlers {
    pub fn new(trail: Arc<dyn Repository<AuditEntry>>) -> Self {
        Self { trail }
    }
}

#[async_trait]
impl RequestHandler<GetAuditEntries> for AuditHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetAuditEntries,
    ) -> Result<PagedList<AuditEntryDto>, AppError> {
        let compare = AuditFilter::resolve_sort(request.list.sort_by.as_deref())?;
        let entries = self.trail.find_where(&request.filter.predicates()).await?;

        Ok(PagedList::create(entries, &request.list, compare).map(AuditEntryDto::from))
    }
}
