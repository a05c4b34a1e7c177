//! # Report collection manager
//!
//! [`ReportManager`] runs report CRUD against a [`Backend`] and keeps a local
//! [`ReportCollection`] in step with what the server confirmed:
//!
//! - listing replaces the collection and sets its [`Scope`];
//! - create sends the submission and changes nothing locally; the new record is
//!   picked up by the next listing;
//! - update merges the patch (or the server's canonical record) into the held
//!   record with the same id;
//! - delete removes the held record only after the server confirmed it.
//!
//! Update and delete refuse ids the collection does not hold before any request
//! is sent. An update that would blank a required field is refused the same way.

use std::collections::HashMap;

use api::{
    ApiError, Backend, CreatedReport, Operation, Report, ReportId, ReportPatch, SearchQuery,
};

use crate::liveness::Liveness;
use crate::outcome::Outcome;
use crate::validation::ReportForm;

/// Failure of a report mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The id is not in the local collection.
    #[error("report {0} is not held locally")]
    NotHeld(ReportId),
}

impl ReportError {
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Api(err) => err.user_message(),
            ReportError::NotHeld(_) => "Report not found".to_string(),
        }
    }
}

/// Which listing a collection was filled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every public report.
    #[default]
    All,
    /// Reports owned by the session user.
    Mine,
}

/// Locally cached, possibly stale copy of one listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportCollection {
    scope: Scope,
    records: Vec<Report>,
}

impl ReportCollection {
    pub fn new(scope: Scope, records: Vec<Report>) -> Self {
        Self { scope, records }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Records in the order the backend returned them.
    pub fn records(&self) -> &[Report] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: ReportId) -> bool {
        self.get(id).is_some()
    }

    pub fn replace(&mut self, scope: Scope, records: Vec<Report>) {
        self.scope = scope;
        self.records = records;
    }

    /// Merge `patch` into the record with `id`, then adopt `canonical` if the
    /// server sent a complete record back. Returns `false` when no such record
    /// is held.
    pub fn merge(&mut self, id: ReportId, patch: &ReportPatch, canonical: Option<Report>) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        record.apply(patch);
        if let Some(canonical) = canonical.filter(|c| c.id == id && c.is_complete()) {
            *record = canonical;
        }
        true
    }

    pub fn remove(&mut self, id: ReportId) -> Option<Report> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }
}

/// Report CRUD with local reconciliation.
pub struct ReportManager<B> {
    backend: B,
    collection: ReportCollection,
    outcomes: HashMap<Operation, Outcome>,
    liveness: Liveness,
}

impl<B: Backend> ReportManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            collection: ReportCollection::default(),
            outcomes: HashMap::new(),
            liveness: Liveness::new(),
        }
    }

    pub fn collection(&self) -> &ReportCollection {
        &self.collection
    }

    pub fn records(&self) -> &[Report] {
        self.collection.records()
    }

    pub fn outcome(&self, op: Operation) -> Option<&Outcome> {
        self.outcomes.get(&op)
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn alive(&self, op: Operation) -> bool {
        let alive = self.liveness.is_alive();
        if !alive {
            tracing::debug!(%op, "report manager gone, discarding response");
        }
        alive
    }

    fn settle<T>(&mut self, op: Operation, result: &Result<T, ReportError>) {
        let outcome = match result {
            Ok(_) => Outcome::Succeeded(()),
            Err(err) => Outcome::Failed(err.user_message()),
        };
        self.outcomes.insert(op, outcome);
    }

    fn fill(
        &mut self,
        op: Operation,
        scope: Scope,
        result: Result<Vec<Report>, ApiError>,
    ) -> Result<Vec<Report>, ApiError> {
        if !self.alive(op) {
            return result;
        }
        self.outcomes.insert(op, Outcome::resolved(&result));
        let records = result?;
        tracing::debug!(%op, count = records.len(), "report collection replaced");
        self.collection.replace(scope, records.clone());
        Ok(records)
    }

    /// Fetch every public report into the collection.
    pub async fn list_all(&mut self) -> Result<Vec<Report>, ApiError> {
        self.outcomes.insert(Operation::ListReports, Outcome::Pending);
        let result = self.backend.list_reports().await;
        self.fill(Operation::ListReports, Scope::All, result)
    }

    /// Fetch the session user's reports into the collection. A missing or
    /// rejected token fails with [`ApiError::Auth`].
    pub async fn list_mine(&mut self, token: &str) -> Result<Vec<Report>, ApiError> {
        self.outcomes.insert(Operation::ListMyReports, Outcome::Pending);
        let result = self.backend.list_my_reports(token).await;
        self.fill(Operation::ListMyReports, Scope::Mine, result)
    }

    /// Fetch one record for a detail view. The collection is not touched.
    pub async fn get(&mut self, id: ReportId) -> Result<Report, ApiError> {
        self.outcomes.insert(Operation::GetReport, Outcome::Pending);
        let result = self.backend.get_report(id).await;
        if self.alive(Operation::GetReport) {
            self.outcomes.insert(Operation::GetReport, Outcome::resolved(&result));
        }
        result
    }

    /// Server-side search. Results are returned, not cached.
    pub async fn search(&mut self, query: &SearchQuery) -> Result<Vec<Report>, ApiError> {
        self.outcomes.insert(Operation::Search, Outcome::Pending);
        let result = self.backend.search(query).await;
        if self.alive(Operation::Search) {
            self.outcomes.insert(Operation::Search, Outcome::resolved(&result));
        }
        result
    }

    /// Free-text search across name, location, contact and details. Results
    /// are returned, not cached.
    pub async fn quick_search(&mut self, term: &str) -> Result<Vec<Report>, ApiError> {
        self.outcomes.insert(Operation::QuickSearch, Outcome::Pending);
        let result = self.backend.quick_search(term).await;
        if self.alive(Operation::QuickSearch) {
            self.outcomes
                .insert(Operation::QuickSearch, Outcome::resolved(&result));
        }
        result
    }

    /// Validate and submit a new report.
    ///
    /// An incomplete form fails with [`ApiError::Validation`] without a request.
    /// Nothing is inserted locally; list again to see the stored record.
    pub async fn create(&mut self, form: &ReportForm, token: &str) -> Result<CreatedReport, ApiError> {
        let report = match form.to_new_report() {
            Ok(report) => report,
            Err(err) => {
                tracing::debug!("report form rejected: {}", err);
                self.outcomes
                    .insert(Operation::CreateReport, Outcome::Failed(err.user_message()));
                return Err(err);
            }
        };

        self.outcomes.insert(Operation::CreateReport, Outcome::Pending);
        let result = self.backend.create_report(&report, token).await;
        if self.alive(Operation::CreateReport) {
            self.outcomes
                .insert(Operation::CreateReport, Outcome::resolved(&result));
            if let Ok(created) = &result {
                tracing::info!(id = ?created.id, "report created");
            }
        }
        result
    }

    /// Send `patch` for a held record and merge it on success.
    pub async fn update(
        &mut self,
        id: ReportId,
        patch: &ReportPatch,
        token: &str,
    ) -> Result<(), ReportError> {
        let blank = patch.blank_fields();
        if !blank.is_empty() {
            tracing::debug!(id, ?blank, "patch rejected");
            let err = ReportError::from(ApiError::Validation(blank));
            self.settle(Operation::UpdateReport, &Err::<(), _>(err.clone()));
            return Err(err);
        }
        if !self.collection.contains(id) {
            let err = ReportError::NotHeld(id);
            tracing::warn!(id, "refusing to update a report that is not held");
            self.settle(Operation::UpdateReport, &Err::<(), _>(err.clone()));
            return Err(err);
        }

        self.outcomes.insert(Operation::UpdateReport, Outcome::Pending);
        let result = self
            .backend
            .update_report(id, patch, token)
            .await
            .map_err(ReportError::from);
        if !self.alive(Operation::UpdateReport) {
            return result.map(|_| ());
        }

        let result = result.and_then(|canonical| {
            if self.collection.merge(id, patch, canonical) {
                tracing::debug!(id, "report merged");
                Ok(())
            } else {
                Err(ReportError::NotHeld(id))
            }
        });
        self.settle(Operation::UpdateReport, &result);
        result
    }

    /// Validate an edit form and send it as a patch.
    pub async fn update_form(
        &mut self,
        id: ReportId,
        form: &ReportForm,
        token: &str,
    ) -> Result<(), ReportError> {
        let patch = match form.to_patch() {
            Ok(patch) => patch,
            Err(err) => {
                let err = ReportError::from(err);
                self.settle(Operation::UpdateReport, &Err::<(), _>(err.clone()));
                return Err(err);
            }
        };
        self.update(id, &patch, token).await
    }

    /// Delete a held record. It stays in the collection until the server confirms.
    pub async fn delete(&mut self, id: ReportId, token: &str) -> Result<(), ReportError> {
        if !self.collection.contains(id) {
            let err = ReportError::NotHeld(id);
            tracing::warn!(id, "refusing to delete a report that is not held");
            self.settle(Operation::DeleteReport, &Err::<(), _>(err.clone()));
            return Err(err);
        }

        self.outcomes.insert(Operation::DeleteReport, Outcome::Pending);
        let result = self
            .backend
            .delete_report(id, token)
            .await
            .map_err(ReportError::from);
        if !self.alive(Operation::DeleteReport) {
            return result;
        }

        match &result {
            Ok(()) => {
                self.collection.remove(id);
                tracing::info!(id, "report deleted");
            }
            Err(err) => tracing::warn!(id, "delete failed: {}", err),
        }
        self.settle(Operation::DeleteReport, &result);
        result
    }
}
