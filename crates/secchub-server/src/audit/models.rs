//! Audit data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor recorded when no caller identity can be resolved.
pub const ANONYMOUS_ACTOR: &str = "anonymous";

/// Audit entry as stored in `audit_log`
///
/// Entries are append-only: no store exposes an update or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Surrogate identifier assigned by the store
    pub id: i64,
    /// Caller email, or [`ANONYMOUS_ACTOR`]
    pub actor_identity: String,
    /// `CREATE`, `UPDATE` or `DELETE`
    pub action: String,
    /// `<ServiceName>.<methodName>`
    pub operation_name: String,
    /// When the writer recorded the entry
    pub timestamp: DateTime<Utc>,
}

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string does not name an audit action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown audit action '{0}' (expected CREATE, UPDATE or DELETE)")]
pub struct UnknownActionError(pub String);

impl std::str::FromStr for AuditAction {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnknownActionError(s.to_string())),
        }
    }
}

/// Input for appending an audit entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub actor_identity: String,
    pub action: AuditAction,
    pub operation_name: String,
    pub timestamp: DateTime<Utc>,
}

impl NewAuditEntry {
    /// Build an entry stamped with the current time.
    ///
    /// A blank actor is recorded as [`ANONYMOUS_ACTOR`].
    pub fn now(
        actor_identity: impl Into<String>,
        action: AuditAction,
        operation_name: impl Into<String>,
    ) -> Self {
        let actor_identity = actor_identity.into();
        let actor_identity = if actor_identity.trim().is_empty() {
            ANONYMOUS_ACTOR.to_string()
        } else {
            actor_identity
        };

        Self {
            actor_identity,
            action,
            operation_name: operation_name.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Read-side filters over the audit log
///
/// `Action` values are matched against the stored uppercase label, so callers
/// normalize before building the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditFilter {
    All,
    Actor(String),
    Action(String),
    Operation(String),
    ActorAndAction { actor: String, action: String },
    /// Inclusive on both ends
    TimestampRange { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl AuditFilter {
    /// Whether `entry` satisfies this filter
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        match self {
            Self::All => true,
            Self::Actor(actor) => entry.actor_identity == *actor,
            Self::Action(action) => entry.action == *action,
            Self::Operation(operation) => entry.operation_name == *operation,
            Self::ActorAndAction { actor, action } => {
                entry.actor_identity == *actor && entry.action == *action
            },
            Self::TimestampRange { start, end } => {
                entry.timestamp >= *start && entry.timestamp <= *end
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(actor: &str, action: AuditAction, operation: &str) -> AuditEntry {
        AuditEntry {
            id: 1,
            actor_identity: actor.to_string(),
            action: action.as_str().to_string(),
            operation_name: operation.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_audit_action_as_str() {
        assert_eq!(AuditAction::Create.as_str(), "CREATE");
        assert_eq!(AuditAction::Update.as_str(), "UPDATE");
        assert_eq!(AuditAction::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_audit_action_parse_is_case_insensitive() {
        assert_eq!("create".parse::<AuditAction>(), Ok(AuditAction::Create));
        assert_eq!("Update".parse::<AuditAction>(), Ok(AuditAction::Update));
        assert_eq!(" DELETE ".parse::<AuditAction>(), Ok(AuditAction::Delete));
        assert!("read".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry("prof@uni.edu", AuditAction::Create, "TeacherService.createTeacher"))
            .unwrap();

        assert_eq!(json["actorIdentity"], "prof@uni.edu");
        assert_eq!(json["action"], "CREATE");
        assert_eq!(json["operationName"], "TeacherService.createTeacher");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("actor_identity").is_none());
    }

    #[test]
    fn test_blank_actor_becomes_anonymous() {
        let new_entry = NewAuditEntry::now("  ", AuditAction::Delete, "EmailService.deleteEmailTemplate");
        assert_eq!(new_entry.actor_identity, ANONYMOUS_ACTOR);

        let new_entry = NewAuditEntry::now("ana@uni.edu", AuditAction::Delete, "X.deleteY");
        assert_eq!(new_entry.actor_identity, "ana@uni.edu");
    }

    #[test]
    fn test_filter_matching() {
        let e = entry("ana@uni.edu", AuditAction::Update, "TeacherService.updateTeacher");

        assert!(AuditFilter::All.matches(&e));
        assert!(AuditFilter::Actor("ana@uni.edu".into()).matches(&e));
        assert!(!AuditFilter::Actor("ANA@uni.edu".into()).matches(&e));
        assert!(AuditFilter::Action("UPDATE".into()).matches(&e));
        assert!(AuditFilter::Operation("TeacherService.updateTeacher".into()).matches(&e));
        assert!(AuditFilter::ActorAndAction {
            actor: "ana@uni.edu".into(),
            action: "UPDATE".into()
        }
        .matches(&e));
        assert!(!AuditFilter::ActorAndAction {
            actor: "ana@uni.edu".into(),
            action: "DELETE".into()
        }
        .matches(&e));
    }

    #[test]
    fn test_timestamp_range_is_inclusive() {
        let e = entry("ana@uni.edu", AuditAction::Create, "X.createY");
        let at = e.timestamp;

        assert!(AuditFilter::TimestampRange { start: at, end: at }.matches(&e));
        assert!(!AuditFilter::TimestampRange {
            start: at + Duration::milliseconds(1),
            end: at + Duration::seconds(1)
        }
        .matches(&e));
        // Inverted bounds are accepted but match nothing
        assert!(!AuditFilter::TimestampRange {
            start: at + Duration::seconds(1),
            end: at - Duration::seconds(1)
        }
        .matches(&e));
    }
}
