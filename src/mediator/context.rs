use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is sending a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User {
        id: i64,
        username: String,
        role: Role,
    },
    /// Internal work, e.g. event consumers.
    System,
}

impl Actor {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Actor::User { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Actor::User {
                role: Role::Admin,
                ..
            } | Actor::System
        )
    }

    /// Owners, admins and the system may modify a resource.
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.is_admin() || self.user_id() == Some(owner_id)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Anonymous => write!(f, "anonymous"),
            Actor::User { id, username, role } => write!(f, "{}#{} ({})", username, id, role),
            Actor::System => write!(f, "system"),
        }
    }
}

/// Authorization requirement of a request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Anonymous,
    Authenticated,
    Admin,
    /// Only internal callers.
    System,
}

impl Policy {
    pub fn permits(&self, actor: &Actor) -> bool {
        match self {
            Policy::Anonymous => true,
            Policy::Authenticated => !matches!(actor, Actor::Anonymous),
            Policy::Admin => actor.is_admin(),
            Policy::System => matches!(actor, Actor::System),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: Uuid,
    pub actor: Actor,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            actor: Actor::Anonymous,
        }
    }

    pub fn for_user(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            actor: Actor::User {
                id,
                username: username.into(),
                role,
            },
        }
    }

    pub fn system() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            actor: Actor::System,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
