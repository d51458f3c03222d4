//! Reconciliation of fetched search items against stored repositories.
//!
//! Each item is matched by GitHub id. Unknown ids are created, changed rows
//! are overwritten, and identical rows are left alone so that re-running the
//! same search performs no writes.

use serde::Serialize;
use serde_json::Value;

use crate::entity::github_repository::Model;
use crate::github::{GitHubError, to_repository_model};
use crate::repository::RepositoryStore;

/// Outcome of comparing one fetched repository with its stored counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No row with this id exists yet.
    Create(Model),
    /// A row exists but differs; carries the merged model to write.
    Update(Model),
    /// The stored row already matches; carries the stored model.
    Unchanged(Model),
}

impl Reconciliation {
    pub fn model(&self) -> &Model {
        match self {
            Self::Create(m) | Self::Update(m) | Self::Unchanged(m) => m,
        }
    }

    pub fn into_model(self) -> Model {
        match self {
            Self::Create(m) | Self::Update(m) | Self::Unchanged(m) => m,
        }
    }

    /// Whether this outcome requires a store write.
    pub fn needs_write(&self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}

/// Decide what to do with `fetched` given the row currently stored under its id.
pub fn reconcile(existing: Option<Model>, fetched: Model) -> Reconciliation {
    match existing {
        None => Reconciliation::Create(fetched),
        Some(stored) => {
            let merged = stored.update_from(&fetched);
            if merged == stored {
                Reconciliation::Unchanged(stored)
            } else {
                Reconciliation::Update(merged)
            }
        }
    }
}

/// Summary of one reconcile run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Reconciled repositories, in payload order.
    pub repositories: Vec<Model>,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Items dropped because they could not be mapped to a repository.
    pub skipped: usize,
}

impl ReconcileReport {
    /// Number of store writes the run performed.
    pub fn writes(&self) -> usize {
        self.created + self.updated
    }

    fn record(&mut self, outcome: Reconciliation) {
        match &outcome {
            Reconciliation::Create(_) => self.created += 1,
            Reconciliation::Update(_) => self.updated += 1,
            Reconciliation::Unchanged(_) => self.unchanged += 1,
        }
        self.repositories.push(outcome.into_model());
    }
}

/// Reconcile raw search items against `store`, one at a time in payload order.
///
/// Items that cannot be mapped are logged and skipped. The first store fault
/// aborts the run; rows written before it stay written.
pub async fn reconcile_items<S>(store: &S, items: Vec<Value>) -> Result<ReconcileReport, GitHubError>
where
    S: RepositoryStore + ?Sized,
{
    let mut report = ReconcileReport::default();

    for raw in items {
        let fetched = match to_repository_model(raw) {
            Ok(model) => model,
            Err(rejection) => {
                tracing::warn!(reason = %rejection, "Skipping search item");
                report.skipped += 1;
                continue;
            }
        };

        let existing = store.find_by_id(fetched.id).await?;
        let outcome = reconcile(existing, fetched);

        if outcome.needs_write() {
            store.save(outcome.model().clone()).await?;
        }

        match &outcome {
            Reconciliation::Create(m) => {
                tracing::info!(id = m.id, repo = %m.full_name(), "Saved new repository");
            }
            Reconciliation::Update(m) => {
                tracing::info!(id = m.id, repo = %m.full_name(), "Updated existing repository");
            }
            Reconciliation::Unchanged(m) => {
                tracing::debug!(id = m.id, repo = %m.full_name(), "Repository unchanged");
            }
        }

        report.record(outcome);
    }

    Ok(report)
}
