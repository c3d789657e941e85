//! Calls the views make against the gateway's own HTTP surface.

use std::future::Future;

use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::diagnostics::{DiagnosticEntry, DiagnosticResponse, NewDiagnostic};
use crate::views::error::ApiError;
use crate::views::model::{Client, ClientPayload};
use crate::views::page::ListResponse;
use crate::views::query::ListQuery;

/// The client-records operations the views depend on.
pub trait ClientsApi {
    fn list_clients(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<ListResponse, ApiError>> + Send;

    fn get_client(&self, id: &str) -> impl Future<Output = Result<Client, ApiError>> + Send;

    fn create_client(
        &self,
        payload: &ClientPayload,
    ) -> impl Future<Output = Result<Client, ApiError>> + Send;

    fn replace_client(
        &self,
        id: &str,
        payload: &ClientPayload,
    ) -> impl Future<Output = Result<Client, ApiError>> + Send;

    fn delete_client(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// HTTP client for a running gateway.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base: Url,
}

impl ProxyClient {
    /// Point at a gateway, e.g. `http://localhost:3000`.
    pub fn new(gateway_url: &str) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), gateway_url)
    }

    pub fn with_client(http: reqwest::Client, gateway_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(gateway_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidUrl(gateway_url.to_string()))?;
        Ok(Self { http, base })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// `GET /api/diagnostics`
    pub async fn list_diagnostics(&self) -> Result<Vec<DiagnosticEntry>, ApiError> {
        let res = self.http.get(self.url(&["api", "diagnostics"])?).send().await?;
        read_json(res).await
    }

    /// `POST /api/diagnostics`
    pub async fn append_diagnostic(
        &self,
        symptome: &str,
        response: DiagnosticResponse,
    ) -> Result<DiagnosticEntry, ApiError> {
        let body = NewDiagnostic {
            symptome: Some(symptome.to_string()),
            response: Some(response),
        };
        let res = self
            .http
            .post(self.url(&["api", "diagnostics"])?)
            .json(&body)
            .send()
            .await?;
        read_json(res).await
    }
}

impl ClientsApi for ProxyClient {
    async fn list_clients(&self, query: &ListQuery) -> Result<ListResponse, ApiError> {
        let mut url = self.url(&["api", "clients"])?;
        url.set_query(Some(&query.to_query_string()));
        let res = self.http.get(url).send().await?;
        read_json(res).await
    }

    async fn get_client(&self, id: &str) -> Result<Client, ApiError> {
        let res = self.http.get(self.url(&["api", "clients", id])?).send().await?;
        read_json(res).await
    }

    async fn create_client(&self, payload: &ClientPayload) -> Result<Client, ApiError> {
        let res = self
            .http
            .post(self.url(&["api", "clients"])?)
            .json(payload)
            .send()
            .await?;
        read_json(res).await
    }

    async fn replace_client(&self, id: &str, payload: &ClientPayload) -> Result<Client, ApiError> {
        let res = self
            .http
            .put(self.url(&["api", "clients", id])?)
            .json(payload)
            .send()
            .await?;
        read_json(res).await
    }

    async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        let res = self
            .http
            .delete(self.url(&["api", "clients", id])?)
            .send()
            .await?;
        ensure_success(res).await.map(|_| ())
    }
}

/// Turn a non-success status into [`ApiError::Status`], keeping the body.
async fn ensure_success(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let res = ensure_success(res).await?;
    let text = res.text().await?;
    Ok(serde_json::from_str(&text)?)
}
