use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::models::AuditEntry;
use crate::filtering::{Comparator, ListFilter, PredicateList};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditFilter {
    pub request_name: Option<String>,
    pub actor_id: Option<i64>,
    pub succeeded: Option<bool>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ListFilter<AuditEntry> for AuditFilter {
    const SORT_COLUMNS: &'static [&'static str] = &["id", "request_name", "created_at"];

    fn predicates(&self) -> PredicateList<AuditEntry> {
        PredicateList::new()
            .when(self.request_name.clone(), |e: &AuditEntry, name: &String| {
                e.request_name.eq_ignore_ascii_case(name)
            })
            .when(self.actor_id, |e: &AuditEntry, id: &i64| e.actor_id == Some(*id))
            .when(self.succeeded, |e: &AuditEntry, ok: &bool| e.succeeded == *ok)
            .when(self.from, |e: &AuditEntry, from: &DateTime<Utc>| e.created_at >= *from)
            .when(self.to, |e: &AuditEntry, to: &DateTime<Utc>| e.created_at <= *to)
    }

    fn sort_column(name: &str) -> Option<Comparator<AuditEntry>> {
        match name {
            "id" => Some(|a, b| a.id.cmp(&b.id)),
            "request_name" => Some(|a, b| a.request_name.cmp(&b.request_name)),
            "created_at" => Some(|a, b| a.created_at.cmp(&b.created_at)),
            _ => None,
        }
    }
}
