//! HTTP client wrapper - issues backend requests and normalizes failures

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::constants::API_KEY_HEADER;
use crate::models::{Alert, Package, PackageUpdate, SubmitReceipt};
use crate::network::api::CourierApi;
use crate::network::error::ApiError;

/// Courier backend client. Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, ApiError> {
        Self::with_builder(base_url, api_key, reqwest::Client::builder())
    }

    fn with_builder(
        base_url: &str,
        api_key: Option<&str>,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidConfig(format!("bad base URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "base URL {} cannot carry a path",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|_| ApiError::InvalidConfig("API key is not a valid header value".into()))?;
            value.set_sensitive(true);
            let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
                .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
            headers.insert(name, value);
        }

        let http = builder
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(ApiClient { http, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode its JSON body, mapping every failure to `ApiError`
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(req).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let resp = req.send().await.map_err(|e| ApiError::from_transport(&e))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Error reading body: {}", e)))?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send_receipt(&self, req: RequestBuilder) -> Result<SubmitReceipt, ApiError> {
        let body = self.send(req).await?;
        decode_receipt(&body)
    }
}

/// A blank body is a valid acknowledgement with nothing to report
pub fn decode_receipt(body: &str) -> Result<SubmitReceipt, ApiError> {
    if body.trim().is_empty() {
        return Ok(SubmitReceipt::default());
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

impl CourierApi for ApiClient {
    async fn list_packages(&self) -> Result<Vec<Package>, ApiError> {
        let url = self.endpoint(&["packages"]);
        self.send_json(self.http.get(url)).await
    }

    async fn get_package(&self, package_id: &str) -> Result<Option<Package>, ApiError> {
        let url = self.endpoint(&["packages", package_id]);
        let found: Vec<Package> = self.send_json(self.http.get(url)).await?;
        Ok(found.into_iter().next())
    }

    async fn create_package(&self, update: &PackageUpdate) -> Result<SubmitReceipt, ApiError> {
        let url = self.endpoint(&["packages", "new"]);
        self.send_receipt(self.http.post(url).json(update)).await
    }

    async fn update_package(
        &self,
        package_id: &str,
        update: &PackageUpdate,
    ) -> Result<SubmitReceipt, ApiError> {
        let url = self.endpoint(&["packages", package_id]);
        self.send_receipt(self.http.put(url).json(update)).await
    }

    async fn list_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        let url = self.endpoint(&["alerts"]);
        self.send_json(self.http.get(url)).await
    }
}
