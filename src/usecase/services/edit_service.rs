use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::entities::deletion::{DeletionWorkflow, WorkflowError};
use crate::domain::entities::notification::Notification;
use crate::domain::entities::record::RowId;
use crate::domain::entities::resource::Resource;
use crate::usecase::ports::data_source::ListDataSource;
use crate::usecase::services::list_cache::ListCache;
use crate::usecase::services::query_service::ListError;

pub struct EditService {
    source: Arc<dyn ListDataSource>,
}

impl EditService {
    pub fn new(source: Arc<dyn ListDataSource>) -> Self {
        Self { source }
    }

    /// Creates when `id` is `None`, otherwise replaces the record. Updates
    /// carry the id inside the payload too.
    pub fn save(
        &self,
        resource: Resource,
        id: Option<&RowId>,
        mut payload: Value,
    ) -> Result<Value, ListError> {
        let result = match id {
            None => self.source.create(resource, &payload),
            Some(id) => {
                if let Value::Object(map) = &mut payload {
                    map.insert("id".to_string(), serde_json::json!(id));
                }
                self.source.update(resource, id, &payload)
            }
        };

        result.map_err(|source| {
            warn!(%resource, error = %source, "save failed");
            ListError::Record {
                resource,
                action: if id.is_some() { "update" } else { "create" },
                id: id.cloned(),
                source,
            }
        })
    }

    pub fn delete(&self, resource: Resource, id: &RowId) -> Result<(), ListError> {
        self.source.delete(resource, id).map_err(|source| {
            warn!(%resource, %id, error = %source, "delete failed");
            ListError::Record {
                resource,
                action: "delete",
                id: Some(id.clone()),
                source,
            }
        })
    }
}

/// Applies a finished delete to the workflow and the shared cache.
pub fn settle_deletion(
    workflow: &mut DeletionWorkflow,
    cache: &mut ListCache,
    resource: Resource,
    result: Result<(), ListError>,
) -> Result<Notification, WorkflowError> {
    let outcome = workflow.finish(resource, result.err().map(|err| err.user_message()))?;
    if outcome.invalidate {
        info!(%resource, id = %outcome.id, "deleted, invalidating cached pages");
        cache.invalidate(resource);
    }
    Ok(outcome.notification)
}

pub fn settle_save(
    cache: &mut ListCache,
    resource: Resource,
    created: bool,
    result: &Result<Value, ListError>,
) -> Notification {
    match result {
        Ok(_) => {
            cache.invalidate(resource);
            let verb = if created { "created" } else { "updated" };
            let mut label = resource.singular().to_string();
            if let Some(first) = label.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            Notification::success(format!("{label} {verb} successfully"))
        }
        Err(err) => Notification::error(err.user_message()),
    }
}
