//! Shareholder notifications
//!
//! The sweeps hand each due event to a [`Notifier`], and document uploads
//! open to every shareholder announce themselves through the same trait. The
//! default [`OutboxNotifier`] renders the message and appends it to a JSONL
//! outbox that a mail relay drains; delivery itself happens outside this
//! crate.

mod outbox;

pub use outbox::{MessageKind, OutboxMessage, OutboxNotifier, Recipient};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PortalResult;
use crate::models::{
    Document, DocumentId, DocumentType, GrantId, NotificationKind, ShareholderId, Units,
    VestingEventId,
};

/// What a shareholder is told about one vesting event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingNotice {
    pub shareholder_id: ShareholderId,
    pub grant_id: GrantId,
    pub event_id: VestingEventId,
    pub units: Units,
    pub vesting_date: NaiveDate,
    pub kind: NotificationKind,
}

impl VestingNotice {
    pub fn is_pre_vest(&self) -> bool {
        self.kind == NotificationKind::PreVest
    }

    /// Subject line of the rendered message
    pub fn subject(&self) -> String {
        if self.is_pre_vest() {
            format!(
                "Upcoming RSU Vesting: {} units on {}",
                self.units, self.vesting_date
            )
        } else {
            format!("RSU Vested: {} units", self.units)
        }
    }

    /// Plain-text body of the rendered message
    pub fn body(&self) -> String {
        let when = self.vesting_date.format("%B %-d, %Y");
        if self.is_pre_vest() {
            format!(
                "{} units of your restricted stock unit grant are scheduled to vest on {}. \
                 No action is required.",
                self.units, when
            )
        } else {
            format!(
                "{} units of your restricted stock unit grant vested on {}. \
                 The updated schedule is available in the portal.",
                self.units, when
            )
        }
    }
}

/// Announcement of a newly uploaded document, sent to every shareholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNotice {
    pub document_id: DocumentId,
    pub title: String,
    pub document_type: DocumentType,
}

impl DocumentNotice {
    pub fn for_document(document: &Document) -> Self {
        Self {
            document_id: document.id,
            title: document.title.clone(),
            document_type: document.document_type,
        }
    }

    pub fn subject(&self) -> String {
        format!("New Document Available: {}", self.title)
    }

    pub fn body(&self) -> String {
        format!(
            "A new {} has been uploaded to the investor portal: {}",
            self.document_type.to_string().replace('_', " "),
            self.title
        )
    }
}

/// Dispatches shareholder notices
///
/// An `Err` means the notice was not handed off. For vesting notices the
/// caller leaves the event's flag clear so the next sweep retries it.
pub trait Notifier {
    fn notify(&self, notice: &VestingNotice) -> PortalResult<()>;

    fn notify_document(&self, notice: &DocumentNotice) -> PortalResult<()>;
}
