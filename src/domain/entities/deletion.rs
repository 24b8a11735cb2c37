use crate::domain::entities::notification::Notification;
use crate::domain::entities::record::RowId;
use crate::domain::entities::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeletionState {
    #[default]
    Idle,
    PendingConfirmation(RowId),
    Deleting(RowId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("another deletion is in progress for {0}")]
    Busy(RowId),
    #[error("no deletion is awaiting confirmation")]
    NotPending,
    #[error("no deletion is running")]
    NotDeleting,
}

/// Result of a finished delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub id: RowId,
    pub notification: Notification,
    /// Cached pages of the resource must be dropped.
    pub invalidate: bool,
}

/// Confirm-then-delete flow shared by every list page. One target at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionWorkflow {
    state: DeletionState,
}

impl DeletionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeletionState {
        &self.state
    }

    pub fn pending_target(&self) -> Option<&RowId> {
        match &self.state {
            DeletionState::PendingConfirmation(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.state, DeletionState::Deleting(_))
    }

    pub fn request_delete(&mut self, id: RowId) -> Result<(), WorkflowError> {
        match &self.state {
            DeletionState::Idle => {
                self.state = DeletionState::PendingConfirmation(id);
                Ok(())
            }
            DeletionState::PendingConfirmation(current) if *current == id => Ok(()),
            DeletionState::PendingConfirmation(current) | DeletionState::Deleting(current) => {
                Err(WorkflowError::Busy(current.clone()))
            }
        }
    }

    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        match &self.state {
            DeletionState::PendingConfirmation(_) => {
                self.state = DeletionState::Idle;
                Ok(())
            }
            DeletionState::Idle => Ok(()),
            DeletionState::Deleting(current) => Err(WorkflowError::Busy(current.clone())),
        }
    }

    /// Moves to `Deleting` and hands back the id the caller must delete.
    pub fn confirm(&mut self) -> Result<RowId, WorkflowError> {
        match std::mem::take(&mut self.state) {
            DeletionState::PendingConfirmation(id) => {
                self.state = DeletionState::Deleting(id.clone());
                Ok(id)
            }
            other => {
                self.state = other;
                Err(WorkflowError::NotPending)
            }
        }
    }

    /// Settles the running delete. `failure` carries the user-facing message.
    /// Returns to `Idle` whatever the result.
    pub fn finish(
        &mut self,
        resource: Resource,
        failure: Option<String>,
    ) -> Result<DeletionOutcome, WorkflowError> {
        let id = match std::mem::take(&mut self.state) {
            DeletionState::Deleting(id) => id,
            other => {
                self.state = other;
                return Err(WorkflowError::NotDeleting);
            }
        };

        Ok(match failure {
            None => DeletionOutcome {
                id,
                notification: Notification::success(format!(
                    "Deleted {} successfully",
                    resource.singular()
                )),
                invalidate: true,
            },
            Some(message) => DeletionOutcome {
                id,
                notification: Notification::error(message),
                invalidate: false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_then_success_returns_to_idle() {
        let mut workflow = DeletionWorkflow::new();
        workflow
            .request_delete(RowId::from("42"))
            .expect("request should succeed");
        assert_eq!(
            workflow.state(),
            &DeletionState::PendingConfirmation(RowId::from("42"))
        );

        let id = workflow.confirm().expect("confirm should succeed");
        assert_eq!(id, RowId::from("42"));
        assert_eq!(workflow.state(), &DeletionState::Deleting(RowId::from("42")));

        let outcome = workflow
            .finish(Resource::Entries, None)
            .expect("finish should succeed");
        assert!(outcome.invalidate);
        assert!(!outcome.notification.is_error());
        assert_eq!(workflow.state(), &DeletionState::Idle);
    }

    #[test]
    fn failure_still_releases_to_idle() {
        let mut workflow = DeletionWorkflow::new();
        workflow
            .request_delete(RowId::from("7"))
            .expect("request should succeed");
        workflow.confirm().expect("confirm should succeed");

        let outcome = workflow
            .finish(Resource::Categories, Some("Category in use".into()))
            .expect("finish should succeed");

        assert!(!outcome.invalidate);
        assert_eq!(outcome.notification, Notification::error("Category in use"));
        assert_eq!(workflow.state(), &DeletionState::Idle);
    }

    #[test]
    fn cancel_clears_target() {
        let mut workflow = DeletionWorkflow::new();
        workflow
            .request_delete(RowId::from("1"))
            .expect("request should succeed");
        workflow.cancel().expect("cancel should succeed");

        assert_eq!(workflow.state(), &DeletionState::Idle);
        assert!(workflow.pending_target().is_none());
    }

    #[test]
    fn only_one_confirmation_at_a_time() {
        let mut workflow = DeletionWorkflow::new();
        workflow
            .request_delete(RowId::from("1"))
            .expect("request should succeed");

        assert_eq!(
            workflow.request_delete(RowId::from("2")),
            Err(WorkflowError::Busy(RowId::from("1")))
        );
        assert_eq!(workflow.request_delete(RowId::from("1")), Ok(()));

        workflow.confirm().expect("confirm should succeed");
        assert_eq!(
            workflow.request_delete(RowId::from("2")),
            Err(WorkflowError::Busy(RowId::from("1")))
        );
        assert_eq!(workflow.cancel(), Err(WorkflowError::Busy(RowId::from("1"))));
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut workflow = DeletionWorkflow::new();

        assert_eq!(workflow.confirm(), Err(WorkflowError::NotPending));
        assert_eq!(
            workflow.finish(Resource::Entries, None),
            Err(WorkflowError::NotDeleting)
        );
        assert_eq!(workflow.state(), &DeletionState::Idle);

        workflow
            .request_delete(RowId::from("3"))
            .expect("request should succeed");
        assert_eq!(
            workflow.finish(Resource::Entries, None),
            Err(WorkflowError::NotDeleting)
        );
        assert_eq!(
            workflow.state(),
            &DeletionState::PendingConfirmation(RowId::from("3"))
        );
    }
}
