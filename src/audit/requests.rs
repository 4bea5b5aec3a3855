use serde::{Deserialize, Serialize};

use crate::audit::filtering::AuditFilter;
use crate::audit::models::AuditEntryDto;
use crate::filtering::{list_rules, range_is_ordered, ListFilter, ListParams, PagedList};
use crate::mediator::Policy;
use crate::request;
use crate::validation::RuleSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAuditEntries {
    pub filter: AuditFilter,
    pub list: ListParams,
}
request!(GetAuditEntries => PagedList<AuditEntryDto>, Query, Policy::Admin);

pub fn get_audit_entries_rules() -> RuleSet<GetAuditEntries> {
    list_rules(
        RuleSet::<GetAuditEntries>::new().must("to", "must not be before 'from'", |q| {
            range_is_ordered(q.filter.from, q.filter.to)
        }),
        |q| &q.list,
        AuditFilter::SORT_COLUMNS,
    )
}
