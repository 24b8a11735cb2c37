use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use ureq::http::StatusCode;

use crate::domain::entities::filter::FilterState;
use crate::domain::entities::page::ListPage;
use crate::domain::entities::record::{MonthlySummary, MonthlyTotals, RowId, User};
use crate::domain::entities::resource::Resource;
use crate::domain::entities::session::SessionHandle;
use crate::usecase::ports::data_source::{
    ApiError, AuthGateway, Credentials, DashboardSource, ListDataSource, LoginGrant,
};

/// Blocking client for the finance API. Every call reads the current token
/// from the shared session; a 401 clears it.
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: SessionHandle) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Option<String> {
        self.session.token().map(|token| format!("Bearer {token}"))
    }

    fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let mut request = self.agent.get(self.url(path));
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", bearer);
        }
        for (name, value) in params {
            request = request.query(name, value);
        }
        debug!(path, params = params.len(), "GET");
        self.finish(path, request.call())
    }

    fn send_json(&self, method: &str, path: &str, payload: &Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut request = match method {
            "PUT" => self.agent.put(url),
            _ => self.agent.post(url),
        };
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", bearer);
        }
        debug!(path, method, "sending");
        self.finish(path, request.send_json(payload))
    }

    fn delete_path(&self, path: &str) -> Result<(), ApiError> {
        let mut request = self.agent.delete(self.url(path));
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", bearer);
        }
        debug!(path, "DELETE");
        self.finish(path, request.call()).map(|_| ())
    }

    /// Turns a raw response into JSON or a classified error. Empty bodies
    /// become `null`.
    fn finish(
        &self,
        path: &str,
        response: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<Value, ApiError> {
        let mut response = response.map_err(|err| {
            warn!(path, error = %err, "request failed");
            ApiError::Transport(err.to_string())
        })?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        if !status.is_success() {
            let err = status_error(status, &body);
            if err.is_unauthorized() {
                warn!(path, "unauthorized, dropping session");
                self.session.clear();
            }
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn record_path(resource: Resource, id: &RowId) -> String {
    format!("{}/{}", resource.path(), id)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Request parameters for a list call. Empty fields are left out.
pub fn query_params(resource: Resource, state: &FilterState) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let search = state.search().trim();
    if !search.is_empty() {
        params.push(("search".to_string(), search.to_string()));
    }
    params.push(("page".to_string(), state.page().to_string()));
    params.push((
        "items_per_page".to_string(),
        state.items_per_page().to_string(),
    ));
    for (column, direction) in state.sort().pairs() {
        params.push(("sort_by[]".to_string(), column.to_string()));
        params.push(("sort_order[]".to_string(), direction.as_str().to_string()));
    }

    for field in resource.filter_fields() {
        if let Some(values) = state.filter_values(*field) {
            let name = format!("{}[]", field.param_name());
            params.extend(values.iter().map(|v| (name.clone(), v.clone())));
        }
    }

    if resource.supports_date_range() {
        let range = state.date_range();
        if let Some(from) = range.from {
            params.push(("from".to_string(), from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = range.to {
            params.push(("to".to_string(), to.format("%Y-%m-%d").to_string()));
        }
    }
    params
}

/// Reads a list response: rows under the resource's key, or a bare array.
pub fn decode_list_page(
    resource: Resource,
    state: &FilterState,
    body: Value,
) -> Result<ListPage<Value>, ApiError> {
    let (rows, total, total_amount) = match body {
        Value::Array(rows) => (rows, None, None),
        Value::Object(mut map) => {
            let rows = match map.remove(resource.rows_key()) {
                Some(Value::Array(rows)) => rows,
                Some(Value::Null) | None => {
                    return Err(ApiError::Decode(format!(
                        "missing `{}` in {resource} response",
                        resource.rows_key()
                    )))
                }
                Some(other) => {
                    return Err(ApiError::Decode(format!(
                        "`{}` is not a list: {other}",
                        resource.rows_key()
                    )))
                }
            };
            let total = map.get("total").and_then(number_as_u64);
            let total_amount = map.get("total_amount").and_then(number_as_f64);
            (rows, total, total_amount)
        }
        other => {
            return Err(ApiError::Decode(format!(
                "unexpected {resource} response: {other}"
            )))
        }
    };

    Ok(ListPage {
        rows,
        total,
        total_amount,
        page: state.page(),
        items_per_page: state.items_per_page(),
    })
}

fn number_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Server message of an error body. The API sends `{"error": "..."}`, some
/// validation paths use `message`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .filter(|message| !message.trim().is_empty())
}

pub fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = error_message(body);
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { message }
    } else {
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl ListDataSource for ApiClient {
    fn fetch_page(
        &self,
        resource: Resource,
        state: &FilterState,
    ) -> Result<ListPage<Value>, ApiError> {
        let body = self.get_json(resource.path(), &query_params(resource, state))?;
        decode_list_page(resource, state, body)
    }

    fn fetch_one(&self, resource: Resource, id: &RowId) -> Result<Value, ApiError> {
        self.get_json(&record_path(resource, id), &[])
    }

    fn create(&self, resource: Resource, payload: &Value) -> Result<Value, ApiError> {
        self.send_json("POST", resource.path(), payload)
    }

    fn update(&self, resource: Resource, id: &RowId, payload: &Value) -> Result<Value, ApiError> {
        self.send_json("PUT", &record_path(resource, id), payload)
    }

    fn delete(&self, resource: Resource, id: &RowId) -> Result<(), ApiError> {
        self.delete_path(&record_path(resource, id))
    }
}

impl AuthGateway for ApiClient {
    fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        let payload = serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password,
        });
        let body = self.send_json("POST", "/login", &payload)?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Decode("login response has no token".to_string()))?
            .to_string();
        let user = decode(body.get("user").cloned().unwrap_or(Value::Null))?;
        Ok(LoginGrant { token, user })
    }

    fn register(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let payload = serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password,
        });
        decode(self.send_json("POST", "/users", &payload)?)
    }
}

impl DashboardSource for ApiClient {
    fn yearly_summary(&self, year: i32) -> Result<Vec<MonthlySummary>, ApiError> {
        decode(self.get_json(&format!("/dashboard/{year}"), &[])?)
    }

    fn monthly_totals(&self, year: i32, month: u32) -> Result<MonthlyTotals, ApiError> {
        decode(self.get_json(&format!("/dashboard/{year}/{month:02}/totals"), &[])?)
    }
}
