//! HTTP client for the TilesView provider webhooks.
//!
//! Every call is a single attempt: credentials are checked up front, the
//! request carries the `app_key` / `app_secret` headers and a JSON body, and
//! only HTTP 200 and 201 count as success. Retrying is left to the caller.

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::Value;
use tvsync_core::{AppConfig, Credentials, DEFAULT_BASE_URL};

use crate::error::TransportError;
use crate::response::{ApiResponse, EnvelopeShape};
use crate::types::{
    CategoryBatch, CategoryPayload, DeletePayload, Endpoint, FilterLookup, FilterPayload,
    ProductBatch, ProductPayload, MAX_BATCH_SIZE,
};

/// Client for the TilesView webhook API.
///
/// Use [`TilesViewClient::new`] for production or
/// [`TilesViewClient::with_base_url`] to point at a mock server in tests.
pub struct TilesViewClient {
    client: Client,
    credentials: Credentials,
    base_url: Url,
    /// Log request payloads and raw response bodies at `debug` level.
    debug: bool,
}

impl TilesViewClient {
    /// Creates a client pointed at the production TilesView API.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(credentials: Credentials, timeout_secs: u64) -> Result<Self, TransportError> {
        Self::with_base_url(credentials, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the underlying
    /// `reqwest::Client` cannot be constructed, or
    /// [`TransportError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        credentials: Credentials,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tvsync/0.1 (catalog-sync)")
            .https_only(base_url.starts_with("https://"))
            .build()
            .map_err(TransportError::ClientBuild)?;

        // Endpoint suffixes are joined onto the base, which only appends when
        // the base path ends with a slash.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| TransportError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            base_url,
            debug: false,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        Ok(Self::with_base_url(
            config.credentials.clone(),
            config.request_timeout_secs,
            &config.base_url,
        )?
        .with_debug(config.debug))
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends one request to `endpoint` and classifies the outcome.
    ///
    /// `context` is a short human label (e.g. `"product insert 42"`) attached
    /// to every log line for this call.
    ///
    /// # Errors
    ///
    /// - [`TransportError::MissingCredentials`] if the key or secret is empty;
    ///   nothing is sent.
    /// - [`TransportError::Network`] on any failure before a status arrives,
    ///   including the request timeout.
    /// - [`TransportError::Http`] for any status other than 200 or 201.
    /// - [`TransportError::Serialize`] if `payload` cannot be encoded.
    pub async fn call<T>(
        &self,
        endpoint: Endpoint,
        method: Method,
        payload: Option<&T>,
        context: &str,
    ) -> Result<ApiResponse, TransportError>
    where
        T: Serialize + ?Sized,
    {
        if !self.credentials.is_complete() {
            tracing::error!(context, "missing TilesView API credentials, request not sent");
            return Err(TransportError::MissingCredentials);
        }

        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(context, %url, %method, "TilesView API call start");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header("app_key", &self.credentials.app_key)
            .header("app_secret", &self.credentials.app_secret);

        if let Some(payload) = payload {
            let body = serde_json::to_vec(payload).map_err(|e| TransportError::Serialize {
                context: context.to_owned(),
                source: e,
            })?;
            if self.debug {
                tracing::debug!(
                    context,
                    payload = %String::from_utf8_lossy(&body),
                    "request payload"
                );
            }
            request = request.body(body);
        }

        let started = Instant::now();
        let sent = request.send().await;
        let duration_ms = started.elapsed().as_millis();

        let response = match sent {
            Ok(response) => response,
            Err(source) => {
                tracing::warn!(context, %url, duration_ms, error = %source, "TilesView request failed");
                return Err(TransportError::Network {
                    url: url.to_string(),
                    source,
                });
            }
        };

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|source| TransportError::Network {
                url: url.to_string(),
                source,
            })?;

        if self.debug {
            tracing::debug!(context, status = status.as_u16(), body = %raw_body, "raw response body");
        }

        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::CREATED {
            tracing::warn!(
                context,
                %url,
                status = status.as_u16(),
                duration_ms,
                "TilesView API returned error status"
            );
            return Err(TransportError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body: raw_body,
            });
        }

        let body = decode_body(&raw_body, context);
        let api_response = ApiResponse::new(status.as_u16(), body);

        if api_response.shape == EnvelopeShape::Unrecognized {
            tracing::warn!(
                context,
                status = status.as_u16(),
                rule = "treat_unrecognized_2xx_as_success",
                "response structure unclear, treating as success"
            );
        }
        tracing::info!(
            context,
            status = status.as_u16(),
            shape = ?api_response.shape,
            duration_ms,
            "TilesView API call succeeded"
        );

        Ok(api_response)
    }

    /// `POST product`
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn create_product(
        &self,
        payload: &ProductPayload,
        context: &str,
    ) -> Result<ApiResponse, TransportError> {
        self.call(Endpoint::Product, Method::POST, Some(payload), context)
            .await
    }

    /// `PUT product`; `payload.tv_prod_id` must be set.
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn update_product(
        &self,
        payload: &ProductPayload,
        context: &str,
    ) -> Result<ApiResponse, TransportError> {
        self.call(Endpoint::Product, Method::PUT, Some(payload), context)
            .await
    }

    /// `DELETE product`
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn delete_products(
        &self,
        payload: &DeletePayload,
        context: &str,
    ) -> Result<ApiResponse, TransportError> {
        self.call(Endpoint::Product, Method::DELETE, Some(payload), context)
            .await
    }

    /// `POST category/`
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn create_category(
        &self,
        payload: &CategoryPayload,
        context: &str,
    ) -> Result<ApiResponse, TransportError> {
        self.call(Endpoint::Category, Method::POST, Some(payload), context)
            .await
    }

    /// `PUT category/`; `payload.tv_prod_id` carries the category's remote id.
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn update_category(
        &self,
        payload: &CategoryPayload,
        context: &str,
    ) -> Result<ApiResponse, TransportError> {
        self.call(Endpoint::Category, Method::PUT, Some(payload), context)
            .await
    }

    /// Registers a filter label with its allowed values.
    ///
    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn add_filter(
        &self,
        label: &str,
        values: &[String],
    ) -> Result<ApiResponse, TransportError> {
        tracing::info!(label, values = values.len(), "adding filter");
        let payload = FilterPayload {
            lbl_name: label.to_owned(),
            values: values.to_vec(),
        };
        self.call(Endpoint::Filters, Method::POST, Some(&payload), "filter add")
            .await
    }

    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn list_filters(&self) -> Result<ApiResponse, TransportError> {
        self.call::<Value>(Endpoint::Filters, Method::GET, None, "filter list")
            .await
    }

    /// # Errors
    ///
    /// See [`TilesViewClient::call`].
    pub async fn find_filter(&self, name: &str) -> Result<ApiResponse, TransportError> {
        let payload = FilterLookup {
            lbl_name: name.to_owned(),
        };
        self.call(
            Endpoint::FilterLookup,
            Method::POST,
            Some(&payload),
            "filter lookup",
        )
        .await
    }

    /// Sends up to [`MAX_BATCH_SIZE`] products in one request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BatchTooLarge`] without sending anything if
    /// `products` exceeds the limit; otherwise see [`TilesViewClient::call`].
    pub async fn batch_sync_products(
        &self,
        products: &[ProductPayload],
    ) -> Result<ApiResponse, TransportError> {
        check_batch_size("product", products.len())?;
        tracing::info!(count = products.len(), "starting batch product sync");
        let payload = ProductBatch { product: products };
        self.call(
            Endpoint::ProductSync,
            Method::POST,
            Some(&payload),
            "batch product sync",
        )
        .await
    }

    /// Sends up to [`MAX_BATCH_SIZE`] categories in one request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BatchTooLarge`] without sending anything if
    /// `categories` exceeds the limit; otherwise see [`TilesViewClient::call`].
    pub async fn batch_sync_categories(
        &self,
        categories: &[CategoryPayload],
    ) -> Result<ApiResponse, TransportError> {
        check_batch_size("category", categories.len())?;
        tracing::info!(count = categories.len(), "starting batch category sync");
        let payload = CategoryBatch {
            category: categories,
        };
        self.call(
            Endpoint::CategorySync,
            Method::POST,
            Some(&payload),
            "batch category sync",
        )
        .await
    }

    pub(crate) fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, TransportError> {
        self.base_url
            .join(endpoint.path().trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

fn check_batch_size(kind: &'static str, len: usize) -> Result<(), TransportError> {
    if len > MAX_BATCH_SIZE {
        tracing::error!(kind, len, max = MAX_BATCH_SIZE, "batch size exceeds limit");
        return Err(TransportError::BatchTooLarge {
            kind,
            len,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}

/// Decodes a 2xx body, mapping empty or non-JSON bodies to `Null`.
fn decode_body(raw: &str, context: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(context, error = %e, "response body is not JSON");
        Value::Null
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
