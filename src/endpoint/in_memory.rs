//! InMemoryEndpoint - Vec-backed resource endpoint for testing and development.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{ListResponse, ResourceEndpoint};
use crate::cache::Pagination;
use crate::error::{ApiError, FieldErrors};
use crate::locks::{lock, read, write};
use crate::query::ListParams;
use crate::resource::{Resource, ResourceId};
use crate::state::SortDirection;

type Validator = dyn Fn(&Value) -> Result<(), FieldErrors> + Send + Sync;

/// Endpoint operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// A recorded endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointCall {
    List(ListParams),
    Create(Value),
    Update(ResourceId, Value),
    Delete(ResourceId),
}

/// In-memory implementation of the full list/mutation contract.
///
/// Behaves like a typical admin API:
/// - the `search` parameter matches case-insensitively against the
///   configured searchable fields
/// - every other filter parameter is an equality match on the row field of
///   the same name
/// - sorting compares numbers numerically and everything else as text;
///   ties keep insertion order
/// - updates are PATCH-style merges of the JSON payload into the row
///
/// Clone-friendly via Arc; clones share rows and the call log.
///
/// ## Example
///
/// ```
/// use resource_browser::{InMemoryEndpoint, ListParams, ResourceEndpoint, ResourceSchema};
/// # use resource_browser::{Resource, ResourceId};
/// # #[derive(Clone, serde::Serialize, serde::Deserialize)]
/// # struct Brand { id: u64, name: String }
/// # impl Resource for Brand {
/// #     const NAME: &'static str = "brands";
/// #     fn id(&self) -> ResourceId { self.id.into() }
/// # }
///
/// # tokio_test_block(async {
/// let endpoint = InMemoryEndpoint::new(vec![
///     Brand { id: 1, name: "Acme".into() },
///     Brand { id: 2, name: "Globex".into() },
/// ])
/// .searchable(["name"]);
///
/// let schema = ResourceSchema::new("brands");
/// let page = endpoint.list(&ListParams::unfiltered(&schema, 10)).await.unwrap();
/// assert_eq!(page.pagination.total, 2);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct InMemoryEndpoint<R> {
    rows: Arc<RwLock<Vec<R>>>,
    search_param: Arc<str>,
    search_fields: Arc<Vec<String>>,
    calls: Arc<Mutex<Vec<EndpointCall>>>,
    failures: Arc<Mutex<Vec<(Operation, ApiError)>>>,
    validator: Option<Arc<Validator>>,
}

impl<R: Resource> Default for InMemoryEndpoint<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Resource> InMemoryEndpoint<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            search_param: Arc::from("search"),
            search_fields: Arc::new(Vec::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
            validator: None,
        }
    }

    /// Fields the `search` parameter matches against.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = Arc::new(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Use a different name for the free-text parameter.
    pub fn search_param(mut self, param: &str) -> Self {
        self.search_param = Arc::from(param);
        self
    }

    /// Server-side validation applied to create and (merged) update payloads.
    pub fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), FieldErrors> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ApiError) {
        lock(&self.failures).push((operation, error));
    }

    /// Insert a row directly, bypassing validation and the call log.
    pub fn insert(&self, row: R) {
        write(&self.rows).push(row);
    }

    /// Remove a row directly, as another admin user would.
    pub fn remove_row(&self, id: &ResourceId) -> Option<R> {
        let mut rows = write(&self.rows);
        let index = rows.iter().position(|r| &r.id() == id)?;
        Some(rows.remove(index))
    }

    pub fn rows(&self) -> Vec<R> {
        read(&self.rows).clone()
    }

    pub fn len(&self) -> usize {
        read(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.rows).is_empty()
    }

    pub fn calls(&self) -> Vec<EndpointCall> {
        lock(&self.calls).clone()
    }

    /// Parameters of every list call, in order.
    pub fn list_calls(&self) -> Vec<ListParams> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                EndpointCall::List(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    /// List calls whose page size differs from `per_page` are excluded.
    pub fn list_calls_with_page_size(&self, per_page: u32) -> Vec<ListParams> {
        self.list_calls()
            .into_iter()
            .filter(|p| p.per_page == per_page)
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: EndpointCall) {
        lock(&self.calls).push(call);
    }

    fn take_failure(&self, operation: Operation) -> Option<ApiError> {
        let mut failures = lock(&self.failures);
        let index = failures.iter().position(|(op, _)| *op == operation)?;
        Some(failures.remove(index).1)
    }

    fn check(&self, value: &Value) -> Result<(), ApiError> {
        match &self.validator {
            Some(validate) => validate(value).map_err(ApiError::Validation),
            None => Ok(()),
        }
    }

    fn matches(&self, row: &Value, params: &ListParams) -> bool {
        params.filters.iter().all(|(param, wanted)| {
            if param.as_str() == &*self.search_param {
                let needle = wanted.to_lowercase();
                self.search_fields.iter().any(|field| {
                    row.get(field)
                        .map(|v| text(v).to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            } else {
                row.get(param)
                    .map(|v| text(v) == *wanted)
                    .unwrap_or(false)
            }
        })
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => text(x).cmp(&text(y)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn decode<R: Resource>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Validation(FieldErrors::global(e.to_string())))
}

fn encode<R: Resource>(row: &R) -> Result<Value, ApiError> {
    serde_json::to_value(row).map_err(|e| ApiError::Transport(e.to_string()))
}

#[async_trait]
impl<R: Resource> ResourceEndpoint for InMemoryEndpoint<R> {
    type Row = R;
    type Payload = Value;

    async fn list(&self, params: &ListParams) -> Result<ListResponse<R>, ApiError> {
        self.record(EndpointCall::List(params.clone()));
        if let Some(err) = self.take_failure(Operation::List) {
            return Err(err);
        }

        let mut matching: Vec<(Value, R)> = Vec::new();
        for row in read(&self.rows).iter() {
            let value = encode(row)?;
            if self.matches(&value, params) {
                matching.push((value, row.clone()));
            }
        }

        matching.sort_by(|(a, _), (b, _)| {
            let ord = compare(a.get(&params.sort_field), b.get(&params.sort_field));
            match params.sort_order {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = matching.len() as u64;
        let per_page = params.per_page.max(1) as usize;
        let skip = (params.page.max(1) as usize - 1).saturating_mul(per_page);
        let rows: Vec<R> = matching
            .into_iter()
            .skip(skip)
            .take(per_page)
            .map(|(_, row)| row)
            .collect();

        Ok(ListResponse {
            pagination: Pagination::for_page(params.page, params.per_page, total, rows.len()),
            rows,
        })
    }

    async fn create(&self, payload: &Value) -> Result<R, ApiError> {
        self.record(EndpointCall::Create(payload.clone()));
        if let Some(err) = self.take_failure(Operation::Create) {
            return Err(err);
        }

        self.check(payload)?;
        let row: R = decode(payload.clone())?;
        let id = row.id();

        let mut rows = write(&self.rows);
        if rows.iter().any(|r| r.id() == id) {
            return Err(ApiError::Validation(
                FieldErrors::new().with_field("id", "has already been taken"),
            ));
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &ResourceId, payload: &Value) -> Result<R, ApiError> {
        self.record(EndpointCall::Update(id.clone(), payload.clone()));
        if let Some(err) = self.take_failure(Operation::Update) {
            return Err(err);
        }

        let mut rows = write(&self.rows);
        let index = rows
            .iter()
            .position(|r| &r.id() == id)
            .ok_or_else(|| ApiError::NotFound(format!("{}:{}", R::NAME, id)))?;

        let mut merged = encode(&rows[index])?;
        if let (Value::Object(target), Value::Object(changes)) = (&mut merged, payload) {
            merge(target, changes);
        } else {
            return Err(ApiError::Validation(FieldErrors::global(
                "update payload must be an object",
            )));
        }

        self.check(&merged)?;
        let row: R = decode(merged)?;
        if &row.id() != id {
            return Err(ApiError::Validation(
                FieldErrors::new().with_field("id", "cannot be changed"),
            ));
        }
        rows[index] = row.clone();
        Ok(row)
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), ApiError> {
        self.record(EndpointCall::Delete(id.clone()));
        if let Some(err) = self.take_failure(Operation::Delete) {
            return Err(err);
        }

        self.remove_row(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("{}:{}", R::NAME, id)))
    }
}

fn merge(target: &mut Map<String, Value>, changes: &Map<String, Value>) {
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
}
