//! JSONL outbox notifier

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DocumentNotice, Notifier, VestingNotice};
use crate::error::{PortalError, PortalResult};
use crate::models::{DocumentId, NotificationKind, ShareholderId, VestingEventId};
use crate::storage::file_io::{append_jsonl, read_jsonl};

/// Who a queued message is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Shareholder(ShareholderId),
    /// Fanned out by the relay to every active shareholder
    AllShareholders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Vested,
    PreVest,
    NewDocument,
}

impl From<NotificationKind> for MessageKind {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Vested => Self::Vested,
            NotificationKind::PreVest => Self::PreVest,
        }
    }
}

/// One queued message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub queued_at: DateTime<Utc>,
    pub to: Recipient,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<VestingEventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
    pub subject: String,
    pub body: String,
}

/// Appends rendered notices to an outbox file
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Everything queued so far, oldest first
    pub fn messages(&self) -> PortalResult<Vec<OutboxMessage>> {
        read_jsonl(&self.path)
    }

    fn queue(&self, message: &OutboxMessage) -> PortalResult<()> {
        append_jsonl(&self.path, message).map_err(|e| {
            PortalError::NotificationDispatch(format!(
                "Failed to queue '{}': {}",
                message.subject, e
            ))
        })
    }
}

impl Notifier for OutboxNotifier {
    fn notify(&self, notice: &VestingNotice) -> PortalResult<()> {
        self.queue(&OutboxMessage {
            queued_at: Utc::now(),
            to: Recipient::Shareholder(notice.shareholder_id),
            kind: notice.kind.into(),
            event_id: Some(notice.event_id),
            document_id: None,
            subject: notice.subject(),
            body: notice.body(),
        })?;

        debug!(event_id = %notice.event_id, kind = %notice.kind, "Queued vesting notice");
        Ok(())
    }

    fn notify_document(&self, notice: &DocumentNotice) -> PortalResult<()> {
        self.queue(&OutboxMessage {
            queued_at: Utc::now(),
            to: Recipient::AllShareholders,
            kind: MessageKind::NewDocument,
            event_id: None,
            document_id: Some(notice.document_id),
            subject: notice.subject(),
            body: notice.body(),
        })?;

        debug!(document_id = %notice.document_id, "Queued new document notice");
        Ok(())
    }
}
