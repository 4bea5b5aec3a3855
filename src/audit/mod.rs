pub mod filtering;
pub mod handlers;
pub mod models;
pub mod requests;

use std::sync::Arc;

use crate::behaviors::ValidatorRegistry;
use crate::error::AppError;
use crate::mediator::Mediator;
use crate::store::Repository;

pub use handlers::AuditHandlers;
pub use models::{AuditEntry, AuditEntryDto};
pub use requests::GetAuditEntries;

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    trail: Arc<dyn Repository<AuditEntry>>,
) -> Result<(), AppError> {
    let handlers = Arc::new(AuditHandlers::new(trail));
    mediator.register::<GetAuditEntries, _>(handlers)?;
    validators.register::<GetAuditEntries, _>(requests::get_audit_entries_rules());
    Ok(())
}
