use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::entities::filter::FilterState;
use crate::domain::entities::page::ListPage;
use crate::domain::entities::record::RowId;
use crate::domain::entities::resource::Resource;
use crate::usecase::ports::data_source::{ApiError, ListDataSource};

/// A failed remote call, tagged with what was being asked for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListError {
    #[error("failed to load {resource} (page {page}, search {search:?}): {source}", page = .state.page(), search = .state.search())]
    Fetch {
        resource: Resource,
        state: Box<FilterState>,
        #[source]
        source: ApiError,
    },
    #[error("failed to {action} {resource} {target}: {source}", target = .id.as_ref().map(RowId::as_str).unwrap_or("-"))]
    Record {
        resource: Resource,
        action: &'static str,
        id: Option<RowId>,
        #[source]
        source: ApiError,
    },
}

impl ListError {
    pub fn api_error(&self) -> &ApiError {
        match self {
            ListError::Fetch { source, .. } | ListError::Record { source, .. } => source,
        }
    }

    pub fn user_message(&self) -> String {
        self.api_error().user_message()
    }

    /// A page fetch whose worker task died, tagged with the filters it was sent with.
    pub fn fetch_task_failed(
        resource: Resource,
        state: FilterState,
        err: impl std::fmt::Display,
    ) -> Self {
        ListError::Fetch {
            resource,
            state: Box::new(state),
            source: ApiError::Transport(err.to_string()),
        }
    }
}

pub struct QueryService {
    source: Arc<dyn ListDataSource>,
}

impl QueryService {
    pub fn new(source: Arc<dyn ListDataSource>) -> Self {
        Self { source }
    }

    /// One attempt; failures come back annotated, never retried.
    pub fn fetch_page(
        &self,
        resource: Resource,
        state: &FilterState,
    ) -> Result<ListPage<Value>, ListError> {
        debug!(%resource, page = state.page(), search = state.search(), "fetching page");
        self.source.fetch_page(resource, state).map_err(|source| {
            warn!(%resource, error = %source, "page fetch failed");
            ListError::Fetch {
                resource,
                state: Box::new(state.clone()),
                source,
            }
        })
    }

    pub fn fetch_one(&self, resource: Resource, id: &RowId) -> Result<Value, ListError> {
        self.source.fetch_one(resource, id).map_err(|source| {
            warn!(%resource, %id, error = %source, "record fetch failed");
            ListError::Record {
                resource,
                action: "load",
                id: Some(id.clone()),
                source,
            }
        })
    }

    /// Every row of a small lookup resource, for select inputs.
    pub fn options(&self, resource: Resource) -> Result<Vec<Value>, ListError> {
        let state = FilterState::new(OPTIONS_PAGE_SIZE).with_sort(resource.default_sort());
        self.fetch_page(resource, &state).map(|page| page.rows)
    }
}

const OPTIONS_PAGE_SIZE: u32 = 1000;
