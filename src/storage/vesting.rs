//! Grant and vesting event repository for JSON storage
//!
//! Grants and their events live together in vesting.json so that a grant and
//! its schedule are written by the same atomic file replace. Every mutation
//! is applied to a copy of the in-memory state, written to disk, and only
//! then swapped in; a failed write leaves both memory and disk untouched.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PortalError, PortalResult};
use crate::models::{
    Grant, GrantId, NotificationKind, ShareholderId, VestingEvent, VestingEventId,
};

use super::file_io::{read_json, write_json_atomic};

/// An event that is due for a notification, with the owner it goes to
#[derive(Debug, Clone, PartialEq)]
pub struct DueEvent {
    pub event: VestingEvent,
    pub shareholder_id: ShareholderId,
}

/// Persistence handle consumed by the grant workflow and the sweeps
pub trait VestingStore {
    /// Persist a new grant and its full schedule as one unit
    fn insert_grant_with_schedule(&self, grant: &Grant, events: &[VestingEvent])
        -> PortalResult<()>;

    fn get_grant(&self, id: GrantId) -> PortalResult<Option<Grant>>;

    /// Replace an existing grant row
    fn update_grant(&self, grant: &Grant) -> PortalResult<()>;

    fn grants_for_shareholder(&self, shareholder_id: ShareholderId) -> PortalResult<Vec<Grant>>;

    /// Events of one grant, ordered by vesting date
    fn events_for_grant(&self, grant_id: GrantId) -> PortalResult<Vec<VestingEvent>>;

    /// Flip every projected event dated on or before `today` to realized.
    /// Returns how many events changed.
    fn realize_due_events(&self, today: NaiveDate) -> PortalResult<usize>;

    /// Events on `date` of active grants whose `kind` flag is still clear.
    ///
    /// `Vested` selects realized events, `PreVest` selects projected ones.
    fn due_for_notification(
        &self,
        date: NaiveDate,
        kind: NotificationKind,
    ) -> PortalResult<Vec<DueEvent>>;

    /// Set the `kind` flag of one event
    fn mark_notified(&self, event_id: VestingEventId, kind: NotificationKind) -> PortalResult<()>;
}

/// On-disk layout of vesting.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VestingData {
    #[serde(default)]
    grants: Vec<Grant>,
    #[serde(default)]
    events: Vec<VestingEvent>,
}

#[derive(Debug, Clone, Default)]
struct VestingState {
    grants: HashMap<GrantId, Grant>,
    events: HashMap<VestingEventId, VestingEvent>,
}

impl VestingState {
    fn from_data(data: VestingData) -> Self {
        Self {
            grants: data.grants.into_iter().map(|g| (g.id, g)).collect(),
            events: data.events.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    fn to_data(&self) -> VestingData {
        let mut grants: Vec<_> = self.grants.values().cloned().collect();
        grants.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut events: Vec<_> = self.events.values().cloned().collect();
        events.sort_by(|a, b| {
            a.grant_id
                .cmp(&b.grant_id)
                .then(a.vesting_date.cmp(&b.vesting_date))
        });

        VestingData { grants, events }
    }

    fn stage_grant(&mut self, grant: &Grant, events: &[VestingEvent]) -> PortalResult<()> {
        if self.grants.contains_key(&grant.id) {
            return Err(PortalError::PersistenceFailure(format!(
                "Grant {} already exists",
                grant.id
            )));
        }
        self.grants.insert(grant.id, grant.clone());

        for event in events {
            if event.grant_id != grant.id {
                return Err(PortalError::PersistenceFailure(format!(
                    "Event {} belongs to grant {}, not {}",
                    event.id, event.grant_id, grant.id
                )));
            }
            if self.events.insert(event.id, event.clone()).is_some() {
                return Err(PortalError::PersistenceFailure(format!(
                    "Vesting event {} already exists",
                    event.id
                )));
            }
        }
        Ok(())
    }
}

/// Repository for grants and vesting events
pub struct VestingRepository {
    path: PathBuf,
    state: RwLock<VestingState>,
}

impl VestingRepository {
    /// Create a new vesting repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(VestingState::default()),
        }
    }

    /// Load grants and events from disk
    pub fn load(&self) -> PortalResult<()> {
        let file_data: VestingData = read_json(&self.path)?;
        let mut state = self.write_state()?;
        *state = VestingState::from_data(file_data);
        Ok(())
    }

    /// Start a transaction; nothing is visible until [`VestingTransaction::commit`]
    pub fn begin(&self) -> VestingTransaction<'_> {
        VestingTransaction {
            repo: self,
            grants: Vec::new(),
        }
    }

    /// Number of stored grants
    pub fn grant_count(&self) -> PortalResult<usize> {
        Ok(self.read_state()?.grants.len())
    }

    /// Number of stored events across all grants
    pub fn event_count(&self) -> PortalResult<usize> {
        Ok(self.read_state()?.events.len())
    }

    /// All grants, oldest first
    pub fn all_grants(&self) -> PortalResult<Vec<Grant>> {
        Ok(self.read_state()?.to_data().grants)
    }

    fn read_state(&self) -> PortalResult<RwLockReadGuard<'_, VestingState>> {
        self.state.read().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write_state(&self) -> PortalResult<RwLockWriteGuard<'_, VestingState>> {
        self.state.write().map_err(|e| {
            PortalError::PersistenceFailure(format!("Failed to acquire write lock: {}", e))
        })
    }

    /// Apply `change` to a copy of the state, persist it, then swap it in
    fn commit_with<F, R>(&self, change: F) -> PortalResult<R>
    where
        F: FnOnce(&mut VestingState) -> PortalResult<R>,
    {
        let mut state = self.write_state()?;
        let mut next = state.clone();
        let out = change(&mut next)?;
        write_json_atomic(&self.path, &next.to_data())?;
        *state = next;
        Ok(out)
    }
}

/// Staged grant inserts, committed together
pub struct VestingTransaction<'a> {
    repo: &'a VestingRepository,
    grants: Vec<(Grant, Vec<VestingEvent>)>,
}

impl VestingTransaction<'_> {
    /// Stage a grant and its events
    pub fn insert_grant(&mut self, grant: Grant, events: Vec<VestingEvent>) -> &mut Self {
        self.grants.push((grant, events));
        self
    }

    /// Write everything staged in one file replace
    pub fn commit(self) -> PortalResult<()> {
        let staged = self.grants;
        let staged_count = staged.len();
        self.repo.commit_with(|state| {
            for (grant, events) in &staged {
                state.stage_grant(grant, events)?;
            }
            Ok(())
        })?;
        debug!(grants = staged_count, "Committed vesting transaction");
        Ok(())
    }

    /// Drop everything staged
    pub fn rollback(self) {
        debug!(grants = self.grants.len(), "Rolled back vesting transaction");
    }
}

impl VestingStore for VestingRepository {
    fn insert_grant_with_schedule(
        &self,
        grant: &Grant,
        events: &[VestingEvent],
    ) -> PortalResult<()> {
        let mut tx = self.begin();
        tx.insert_grant(grant.clone(), events.to_vec());
        tx.commit()
    }

    fn get_grant(&self, id: GrantId) -> PortalResult<Option<Grant>> {
        Ok(self.read_state()?.grants.get(&id).cloned())
    }

    fn update_grant(&self, grant: &Grant) -> PortalResult<()> {
        self.commit_with(|state| match state.grants.get_mut(&grant.id) {
            Some(existing) => {
                *existing = grant.clone();
                Ok(())
            }
            None => Err(PortalError::grant_not_found(grant.id.to_string())),
        })
    }

    fn grants_for_shareholder(&self, shareholder_id: ShareholderId) -> PortalResult<Vec<Grant>> {
        let state = self.read_state()?;
        let mut grants: Vec<_> = state
            .grants
            .values()
            .filter(|g| g.shareholder_id == shareholder_id)
            .cloned()
            .collect();
        grants.sort_by(|a, b| {
            a.terms
                .grant_date
                .cmp(&b.terms.grant_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(grants)
    }

    fn events_for_grant(&self, grant_id: GrantId) -> PortalResult<Vec<VestingEvent>> {
        let state = self.read_state()?;
        let mut events: Vec<_> = state
            .events
            .values()
            .filter(|e| e.grant_id == grant_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.vesting_date);
        Ok(events)
    }

    fn realize_due_events(&self, today: NaiveDate) -> PortalResult<usize> {
        let due = self
            .read_state()?
            .events
            .values()
            .filter(|e| e.is_projected && e.vesting_date <= today)
            .count();
        if due == 0 {
            return Ok(0);
        }

        self.commit_with(|state| {
            Ok(state
                .events
                .values_mut()
                .map(|e| e.realize_if_due(today))
                .filter(|changed| *changed)
                .count())
        })
    }

    fn due_for_notification(
        &self,
        date: NaiveDate,
        kind: NotificationKind,
    ) -> PortalResult<Vec<DueEvent>> {
        let state = self.read_state()?;
        let want_projected = kind == NotificationKind::PreVest;

        let mut due: Vec<_> = state
            .events
            .values()
            .filter(|e| {
                e.vesting_date == date && e.is_projected == want_projected && !e.is_notified(kind)
            })
            .filter_map(|e| {
                state
                    .grants
                    .get(&e.grant_id)
                    .filter(|g| g.is_active())
                    .map(|g| DueEvent {
                        event: e.clone(),
                        shareholder_id: g.shareholder_id,
                    })
            })
            .collect();
        due.sort_by(|a, b| a.event.grant_id.cmp(&b.event.grant_id));
        Ok(due)
    }

    fn mark_notified(&self, event_id: VestingEventId, kind: NotificationKind) -> PortalResult<()> {
        self.commit_with(|state| match state.events.get_mut(&event_id) {
            Some(event) => {
                event.mark_notified(kind);
                Ok(())
            }
            None => Err(PortalError::event_not_found(event_id.to_string())),
        })
    }
}
