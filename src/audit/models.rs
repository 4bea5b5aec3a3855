use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::mediator::{RequestContext, RequestInfo};

/// One command that went through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default)]
    pub id: i64,
    pub request_name: String,
    pub actor: String,
    pub actor_id: Option<i64>,
    pub correlation_id: Uuid,
    pub payload: Option<serde_json::Value>,
    pub succeeded: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

crate::entity!(AuditEntry, "AuditEntry", "audit_log");

impl AuditEntry {
    pub fn record<T>(request: &RequestInfo<'_>, ctx: &RequestContext, outcome: &Result<T, AppError>) -> Self {
        Self {
            id: 0,
            request_name: request.name.to_string(),
            actor: ctx.actor.to_string(),
            actor_id: ctx.actor.user_id(),
            correlation_id: ctx.correlation_id,
            payload: request.to_json(),
            succeeded: outcome.is_ok(),
            error: outcome.as_ref().err().map(ToString::to_string),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntryDto {
    pub id: i64,
    pub request_name: String,
    pub actor: String,
    pub correlation_id: String,
    pub payload: Option<serde_json::Value>,
    pub succeeded: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditEntryDto {
    fn from(entry: AuditEntry) -> Self {
        Self {
            id: entry.id,
            request_name: entry.request_name,
            actor: entry.actor,
            correlation_id: entry.correlation_id.to_string(),
            payload: entry.payload,
            succeeded: entry.succeeded,
            error: entry.error,
            created_at: entry.created_at,
        }
    }
}
