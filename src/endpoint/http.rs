//! HTTP implementation of the endpoint contract.
//!
//! Requires the `http` feature. Uses reqwest.
//!
//! ## Routes
//!
//! - `GET    {base}/{resource}?page=..&per_page=..&sort_field=..&sort_order=..&<facets>`
//! - `POST   {base}/{resource}`: JSON payload, returns the created row
//! - `PUT    {base}/{resource}/{id}`: JSON payload, returns the updated row
//! - `DELETE {base}/{resource}/{id}`
//!
//! Rows may come back bare or wrapped as `{ "data": row }`.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ListResponse, ResourceEndpoint};
use crate::error::ApiError;
use crate::query::ListParams;
use crate::resource::{Resource, ResourceId};

/// REST endpoint for resource `R` with mutation payload `P`.
pub struct HttpEndpoint<R, P = Value> {
    client: Client,
    base_url: String,
    path: String,
    _marker: PhantomData<fn() -> (R, P)>,
}

impl<R, P> Clone for HttpEndpoint<R, P> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource, P> HttpEndpoint<R, P> {
    /// Endpoint at `{base_url}/{R::NAME}`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Share a configured client (timeouts, auth headers) across endpoints.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            path: R::NAME.to_string(),
            _marker: PhantomData,
        }
    }

    /// Override the collection path (e.g., `"admin/products"`).
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.trim_matches('/').to_string();
        self
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.path)
    }

    fn member_url(&self, id: &ResourceId) -> String {
        format!("{}/{}/{}", self.base_url, self.path, id)
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Read the body of a failed response and normalize it.
async fn failure(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    ApiError::from_response(status, &body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(failure(response).await);
    }
    response.json::<T>().await.map_err(transport)
}

fn unwrap_data<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    let value = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| ApiError::Transport(e.to_string()))
}

#[async_trait]
impl<R, P> ResourceEndpoint for HttpEndpoint<R, P>
where
    R: Resource,
    P: Serialize + Send + Sync + 'static,
{
    type Row = R;
    type Payload = P;

    async fn list(&self, params: &ListParams) -> Result<ListResponse<R>, ApiError> {
        let response = self
            .client
            .get(self.collection_url())
            .query(&params.to_query_pairs())
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn create(&self, payload: &P) -> Result<R, ApiError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(payload)
            .send()
            .await
            .map_err(transport)?;
        unwrap_data(decode::<Value>(response).await?)
    }

    async fn update(&self, id: &ResourceId, payload: &P) -> Result<R, ApiError> {
        let response = self
            .client
            .put(self.member_url(id))
            .json(payload)
            .send()
            .await
            .map_err(transport)?;
        unwrap_data(decode::<Value>(response).await?)
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.member_url(id))
            .send()
            .await
            .map_err(transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(response).await)
        }
    }
}
