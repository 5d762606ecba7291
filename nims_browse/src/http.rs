/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! HTTP implementation of [`DataService`] and TLS-aware `reqwest`
//! client construction.
//!
//! Address handling:
//! - `addr` may be `host:port` (no scheme) or an explicit
//!   `http://...` / `https://...`.
//! - If a scheme is provided, it is treated as authoritative.
//!
//! TLS is enabled when the scheme is `https` or when a CA file is
//! configured and loads. A client identity (cert + key) is attached on
//! a best-effort basis: failing to parse it does not disable TLS.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::id_dict::IdDictionary;
use crate::level::Level;
use crate::panel::Row;
use crate::service::DataService;
use crate::service::ServiceError;
use crate::service::TransferOutcome;
use crate::service::TrashView;
use crate::wire;
use crate::wire::Form;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`build_client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub addr: String,
    pub timeout: Duration,
    pub tls_ca: Option<String>,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

impl ClientConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
            tls_ca: None,
            tls_cert: None,
            tls_key: None,
        }
    }
}

/// Split `addr` into an explicit `http`/`https` scheme, if any, and the
/// rest.
fn split_scheme(addr: &str) -> (Option<&str>, &str) {
    match addr.split_once("://") {
        Some((scheme @ ("http" | "https"), rest)) => (Some(scheme), rest),
        _ => (None, addr),
    }
}

#[derive(Debug, thiserror::Error)]
enum TlsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid PEM: {0}")]
    Pem(#[from] reqwest::Error),
}

fn read_pem(path: &str) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path).map_err(|source| TlsError::Read {
        path: path.to_string(),
        source,
    })
}

/// Client identity from the configured cert and key, if both are set.
fn client_identity(config: &ClientConfig) -> Option<Result<reqwest::Identity, TlsError>> {
    let (cert, key) = (config.tls_cert.as_deref()?, config.tls_key.as_deref()?);
    let identity = read_pem(cert).and_then(|mut pem| {
        pem.extend(read_pem(key)?);
        Ok(reqwest::Identity::from_pem(&pem)?)
    });
    Some(identity)
}

/// Trust the configured CA and attach the client identity. Returns
/// whether the CA was installed; a bad identity only logs.
fn configure_tls(
    builder: reqwest::ClientBuilder,
    config: &ClientConfig,
) -> (reqwest::ClientBuilder, bool) {
    let Some(ca_path) = config.tls_ca.as_deref() else {
        return (builder, false);
    };
    let ca = read_pem(ca_path).and_then(|pem| Ok(reqwest::Certificate::from_pem(&pem)?));
    let builder = match ca {
        Ok(ca) => builder.add_root_certificate(ca),
        Err(error) => {
            tracing::warn!(ca = ca_path, %error, "TLS: CA not installed");
            return (builder, false);
        }
    };
    match client_identity(config) {
        Some(Ok(identity)) => (builder.identity(identity), true),
        Some(Err(error)) => {
            tracing::warn!(%error, "TLS: client identity not attached");
            (builder, true)
        }
        None => (builder, true),
    }
}

/// Build a `reqwest` client and a base URL from `config`.
///
/// Returns `(base_url, client)` where `base_url` always includes the
/// selected scheme and has no trailing slash. An explicit scheme wins;
/// otherwise https is used when the CA loaded.
pub fn build_client(config: &ClientConfig) -> (String, reqwest::Client) {
    let (explicit, host) = split_scheme(&config.addr);
    let (builder, ca_installed) =
        configure_tls(reqwest::Client::builder().timeout(config.timeout), config);
    let scheme = explicit.unwrap_or(if ca_installed { "https" } else { "http" });
    let base_url = format!("{}://{}", scheme, host.trim_end_matches('/'));
    let client = builder.build().unwrap_or_else(|e| {
        tracing::warn!("falling back to default HTTP client: {}", e);
        reqwest::Client::new()
    });

    (base_url, client)
}

/// [`DataService`] over the browse endpoints of a NIMS web server.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataService {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let (base_url, client) = build_client(config);
        Self::new(base_url, client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post(&self, endpoint: &str, form: &Form) -> Result<reqwest::Response, ServiceError> {
        let resp = self
            .client
            .post(self.url(endpoint))
            .form(form)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(ServiceError::Status(resp.status().as_u16()))
        }
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &Form,
    ) -> Result<T, ServiceError> {
        self.post(endpoint, form)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn list(&self, level: Level, parent: Option<u64>) -> Result<Vec<Row>, ServiceError> {
        let form = wire::list_form(level, parent)?;
        let response: wire::ListResponse = self.post_json(wire::LIST_QUERY, &form).await?;
        wire::rows_from_list(level, response)
    }

    async fn transfer_sessions(
        &self,
        sessions: &[u64],
        experiment: u64,
    ) -> Result<TransferOutcome, ServiceError> {
        let form = wire::transfer_form(sessions, experiment);
        let response: wire::TransferResponse =
            self.post_json(wire::TRANSFER_SESSIONS, &form).await?;
        wire::transfer_outcome(response)
    }

    async fn trash(&self, ids: &IdDictionary) -> Result<(), ServiceError> {
        let form = wire::trash_form(ids);
        let response: wire::MutationResponse = self.post_json(wire::TRASH, &form).await?;
        wire::mutation_outcome(response)
    }

    async fn trash_view(&self) -> Result<TrashView, ServiceError> {
        let value: serde_json::Value = self.post_json(wire::GET_TRASH_FLAG, &Form::new()).await?;
        wire::trash_view_from_value(&value)
    }

    async fn set_trash_view(&self, view: TrashView) -> Result<(), ServiceError> {
        let form = wire::set_trash_form(view);
        let response: wire::MutationResponse = self.post_json(wire::SET_TRASH_FLAG, &form).await?;
        wire::mutation_outcome(response)
    }

    async fn download(&self, ids: &IdDictionary) -> Result<(), ServiceError> {
        let form = wire::download_form(ids)?;
        self.post(wire::DOWNLOAD, &form).await.map(|_| ())
    }
}
