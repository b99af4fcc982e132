//! Save-time orchestration: chronology, then business hours, then conflicts.
//!
//! Each step short-circuits, so the conflict lookup never runs against an
//! interval that already failed, and nothing is written to the store unless
//! every step passed.
//!
//! The check-then-write sequence is not atomic against other writers to the
//! same store. That is fine for a single-user tool; a shared store would need
//! a transaction around [`Scheduler::check`] and the write that follows it.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::conflict::find_conflicts;
use crate::error::{Result, ScheduleError};
use crate::hours::{validate_business_hours, BusinessHours};
use crate::interval::validate_chronology;
use crate::model::{
    Appointment, AppointmentDraft, AppointmentId, Customer, CustomerDraft, CustomerId, DivisionId,
};
use crate::store::{AppointmentStore, DirectoryStore};

/// Validates and persists appointments against an injected store.
#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
    hours: BusinessHours,
    viewer: Tz,
}

impl<S: AppointmentStore> Scheduler<S> {
    /// `viewer` is the zone proposed start/end values are entered in.
    pub fn new(store: S, hours: BusinessHours, viewer: Tz) -> Self {
        Self {
            store,
            hours,
            viewer,
        }
    }

    pub fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    pub fn viewer(&self) -> Tz {
        self.viewer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Decide whether `[start, end]` may be saved.
    ///
    /// Pass the id of the appointment being edited as `exclude` so it does not
    /// conflict with itself; `None` for a new appointment.
    pub fn check(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<AppointmentId>,
    ) -> Result<()> {
        validate_chronology(start, end)?;
        validate_business_hours(start, end, &self.hours, self.viewer)?;
        let conflicts = find_conflicts(&self.store, start, end, exclude)?;
        if !conflicts.is_empty() {
            return Err(ScheduleError::Conflict { conflicts });
        }
        Ok(())
    }

    /// Validate and store a new appointment.
    pub fn create(&mut self, draft: AppointmentDraft) -> Result<Appointment> {
        let draft = draft.normalized()?;
        self.check(draft.start, draft.end, None)
            .inspect_err(|e| warn!(error = %e, "appointment rejected"))?;
        let appointment = self.store.insert(draft)?;
        info!(id = %appointment.id, customer = %appointment.customer_id, "appointment created");
        Ok(appointment)
    }

    /// Validate and store changes to an existing appointment.
    pub fn update(&mut self, appointment: Appointment) -> Result<Appointment> {
        let id = appointment.id;
        if self.store.get(id)?.is_none() {
            return Err(ScheduleError::UnknownAppointment(id));
        }
        let appointment = appointment.into_draft().normalized()?.with_id(id);
        self.check(appointment.start, appointment.end, Some(id))
            .inspect_err(|e| warn!(%id, error = %e, "appointment update rejected"))?;
        self.store.update(&appointment)?;
        info!(%id, "appointment updated");
        Ok(appointment)
    }

    /// Remove an appointment, returning the deleted record.
    pub fn delete(&mut self, id: AppointmentId) -> Result<Appointment> {
        let removed = self
            .store
            .delete(id)?
            .ok_or(ScheduleError::UnknownAppointment(id))?;
        info!(%id, "appointment deleted");
        Ok(removed)
    }
}

impl<S: AppointmentStore + DirectoryStore> Scheduler<S> {
    /// Validate and store a new customer.
    pub fn create_customer(&mut self, draft: CustomerDraft) -> Result<Customer> {
        let draft = draft.normalized()?;
        self.require_division(draft.division_id)?;
        let customer = self.store.insert_customer(draft)?;
        info!(customer = %customer.id, division = %customer.division_id, "customer created");
        Ok(customer)
    }

    /// Validate and store changes to an existing customer.
    pub fn update_customer(&mut self, customer: Customer) -> Result<Customer> {
        let id = customer.id;
        if !self.store.customers()?.iter().any(|c| c.id == id) {
            return Err(ScheduleError::UnknownCustomer(id));
        }
        let customer = customer.into_draft().normalized()?.with_id(id);
        self.require_division(customer.division_id)?;
        self.store.update_customer(&customer)?;
        info!(customer = %id, "customer updated");
        Ok(customer)
    }

    fn require_division(&self, division: DivisionId) -> Result<()> {
        if self.store.divisions()?.iter().any(|d| d.id == division) {
            Ok(())
        } else {
            Err(ScheduleError::UnknownDivision(division))
        }
    }

    /// Remove a customer together with all of their appointments, returning
    /// how many appointments went with them.
    pub fn delete_customer(&mut self, customer: CustomerId) -> Result<usize> {
        if !self.store.customers()?.iter().any(|c| c.id == customer) {
            return Err(ScheduleError::UnknownCustomer(customer));
        }
        let removed = self.store.delete_by_customer(customer)?;
        self.store.delete_customer(customer)?;
        info!(%customer, appointments = removed, "customer deleted");
        Ok(removed)
    }
}
