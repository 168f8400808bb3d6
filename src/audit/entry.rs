//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was read (document downloads)
    Access,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Access => write!(f, "ACCESS"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Grant,
    Document,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Grant => write!(f, "Grant"),
            EntityType::Document => write!(f, "Document"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable description of the entity (e.g. document title)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Who performed the operation: a role, optionally with a user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Entity state before an update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Entity state after a create or update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Short summary of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            actor: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created entity
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// Entry for a state change
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::base(Operation::Update, entity_type, entity_id.into())
        }
    }

    /// Entry for a read of sensitive content
    pub fn access(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            ..Self::base(Operation::Access, entity_type, entity_id.into())
        }
    }

    /// Attach the acting role or user
    pub fn with_actor(mut self, actor: impl ToString) -> Self {
        self.actor = Some(actor.to_string());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(actor) = &self.actor {
            output.push_str(&format!(" by {}", actor));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Access.to_string(), "ACCESS");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Grant,
            "grt-12345678",
            None,
            &json!({"total_units": "4800"}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Grant);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_entry() {
        let entry = AuditEntry::update(
            EntityType::Grant,
            "grt-12345678",
            None,
            &json!({"status": "active"}),
            &json!({"status": "cancelled"}),
            Some("status: active -> cancelled".to_string()),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert!(entry.before.is_some());
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("status: active -> cancelled")
        );
    }

    #[test]
    fn test_access_entry_has_no_payload() {
        let entry = AuditEntry::access(EntityType::Document, "doc-1", Some("Q3 letter".into()))
            .with_actor("board_member");

        assert_eq!(entry.operation, Operation::Access);
        assert!(entry.before.is_none() && entry.after.is_none());
        assert_eq!(entry.actor.as_deref(), Some("board_member"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::access(EntityType::Document, "doc-1", None);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"operation\":\"access\""));
        assert!(!json.contains("before"));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entity_type, EntityType::Document);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::access(EntityType::Document, "doc-42", Some("Minutes".into()))
            .with_actor("admin_view");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("ACCESS"));
        assert!(formatted.contains("Document"));
        assert!(formatted.contains("doc-42"));
        assert!(formatted.contains("(Minutes)"));
        assert!(formatted.contains("by admin_view"));
    }
}
