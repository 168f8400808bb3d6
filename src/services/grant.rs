//! Grant service
//!
//! Creates grants together with their computed schedule, cancels them, and
//! answers schedule and summary queries for a shareholder.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{PortalError, PortalResult};
use crate::models::{
    Grant, GrantId, Role, ShareClassId, ShareholderId, Units, VestingEvent, VestingFrequency,
    VestingTerms,
};
use crate::storage::{Storage, VestingStore};
use crate::vesting::compute_schedule;

/// Parameters of a new grant
#[derive(Debug, Clone)]
pub struct NewGrant {
    pub shareholder_id: ShareholderId,
    pub share_class_id: ShareClassId,
    pub grant_date: NaiveDate,
    pub vesting_start_date: NaiveDate,
    pub total_units: Units,
    pub cliff_months: u32,
    pub duration_months: u32,
    pub frequency: VestingFrequency,
    pub grant_document_path: Option<String>,
    pub notes: String,
}

impl NewGrant {
    fn terms(&self) -> VestingTerms {
        VestingTerms {
            grant_date: self.grant_date,
            vesting_start_date: self.vesting_start_date,
            total_units: self.total_units,
            cliff_months: self.cliff_months,
            duration_months: self.duration_months,
            frequency: self.frequency,
        }
    }
}

/// Vesting totals across a shareholder's active grants
#[derive(Debug, Clone, PartialEq)]
pub struct VestingSummary {
    pub shareholder_id: ShareholderId,
    pub active_grants: usize,
    pub total_granted: Units,
    /// Units in realized events
    pub total_vested: Units,
    pub total_unvested: Units,
    pub next_vesting: Option<(NaiveDate, Units)>,
}

/// Service for grant management
pub struct GrantService<'a> {
    store: &'a dyn VestingStore,
    audit: &'a AuditLogger,
}

impl<'a> GrantService<'a> {
    /// Create a grant service over the default storage
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            store: &storage.vesting,
            audit: storage.audit(),
        }
    }

    /// Create a grant service over any vesting store
    pub fn with_store(store: &'a dyn VestingStore, audit: &'a AuditLogger) -> Self {
        Self { store, audit }
    }

    /// Create a grant and persist it with its full schedule
    ///
    /// `today` classifies each computed event as projected or realized.
    /// Either the grant and every event are stored, or nothing is.
    pub fn create_grant(
        &self,
        role: Role,
        params: NewGrant,
        today: NaiveDate,
    ) -> PortalResult<Grant> {
        role.require_editor()?;

        let terms = params.terms();
        terms.validate()?;

        let schedule = compute_schedule(&terms, today)?;
        if schedule.is_empty() {
            return Err(PortalError::InvalidInput(
                "Grant terms produce no vesting events".into(),
            ));
        }

        let mut grant = Grant::new(params.shareholder_id, params.share_class_id, terms);
        grant.grant_document_path = params.grant_document_path;
        grant.notes = params.notes.trim().to_string();

        let events: Vec<_> = schedule
            .iter()
            .map(|s| VestingEvent::new(grant.id, s.vesting_date, s.units, s.is_projected))
            .collect();

        self.store.insert_grant_with_schedule(&grant, &events)?;
        debug!(grant_id = %grant.id, events = events.len(), "Stored grant schedule");

        self.audit.log_committed(
            &AuditEntry::create(EntityType::Grant, grant.id.to_string(), None, &grant)
                .with_actor(role),
        );

        info!(
            grant_id = %grant.id,
            shareholder_id = %grant.shareholder_id,
            units = %grant.terms.total_units,
            "Created grant"
        );

        Ok(grant)
    }

    /// Cancel an active grant; its events are kept
    pub fn cancel_grant(
        &self,
        role: Role,
        grant_id: GrantId,
        reason: &str,
        today: NaiveDate,
    ) -> PortalResult<Grant> {
        role.require_editor()?;

        let before = self
            .store
            .get_grant(grant_id)?
            .ok_or_else(|| PortalError::grant_not_found(grant_id.to_string()))?;

        if !before.is_active() {
            return Err(PortalError::InvalidInput(format!(
                "Grant {} is already cancelled",
                grant_id
            )));
        }

        let mut grant = before.clone();
        grant.cancel(today, reason)?;
        self.store.update_grant(&grant)?;

        self.audit.log_committed(
            &AuditEntry::update(
                EntityType::Grant,
                grant.id.to_string(),
                None,
                &before,
                &grant,
                Some(format!("status: {} -> {}", before.status, grant.status)),
            )
            .with_actor(role),
        );

        info!(grant_id = %grant.id, "Cancelled grant");
        Ok(grant)
    }

    /// Get a grant by ID
    pub fn get(&self, grant_id: GrantId) -> PortalResult<Option<Grant>> {
        self.store.get_grant(grant_id)
    }

    /// Stored events of a grant, ordered by date
    pub fn grant_schedule(&self, grant_id: GrantId) -> PortalResult<Vec<VestingEvent>> {
        if self.store.get_grant(grant_id)?.is_none() {
            return Err(PortalError::grant_not_found(grant_id.to_string()));
        }
        self.store.events_for_grant(grant_id)
    }

    pub fn grants_for_shareholder(&self, shareholder_id: ShareholderId) -> PortalResult<Vec<Grant>> {
        self.store.grants_for_shareholder(shareholder_id)
    }

    /// Totals over the shareholder's active grants
    pub fn vesting_summary(&self, shareholder_id: ShareholderId) -> PortalResult<VestingSummary> {
        let grants: Vec<_> = self
            .store
            .grants_for_shareholder(shareholder_id)?
            .into_iter()
            .filter(|g| g.is_active())
            .collect();

        let mut total_granted = Units::zero();
        let mut total_vested = Units::zero();
        let mut next_vesting: Option<(NaiveDate, Units)> = None;

        for grant in &grants {
            total_granted += grant.terms.total_units;

            for event in self.store.events_for_grant(grant.id)? {
                if !event.is_projected {
                    total_vested += event.units;
                    continue;
                }
                next_vesting = match next_vesting {
                    Some((date, units)) if date == event.vesting_date => {
                        Some((date, units + event.units))
                    }
                    Some((date, units)) if date < event.vesting_date => Some((date, units)),
                    _ => Some((event.vesting_date, event.units)),
                };
            }
        }

        Ok(VestingSummary {
            shareholder_id,
            active_grants: grants.len(),
            total_granted,
            total_vested,
            total_unvested: total_granted - total_vested,
            next_vesting,
        })
    }
}
