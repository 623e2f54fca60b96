//! Clients for the external collaborators: the IN100 lookup API (sign-in +
//! balance finder), the bank registry, the hosted persistence service and
//! the origin-IP lookup.
//!
//! Each client owns its `reqwest::Client`, takes its endpoints from
//! [`Config`] and maps transport failures into the [`AppError`] taxonomy at
//! the boundary.

use crate::config::{AuthMode, Config};
use crate::errors::AppError;
use crate::models::{BankInfo, ConsultaRow, QueryRequest, RawBenefitRecord};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// Outcome of a balance lookup that did not fail.
#[derive(Debug)]
pub enum LookupOutcome {
    /// 2xx with a body: the raw record, possibly sparse.
    Record(Box<RawBenefitRecord>),
    /// 204 or empty body: the benefit exists but carried no data.
    Empty,
}

/// Client for the IN100 balance lookup API.
pub struct BenefitApiService {
    client: Client,
    base_url: String,
    auth: AuthMode,
}

impl BenefitApiService {
    /// The finder endpoint long-polls upstream (up to `attempts` tries), so
    /// the client timeout is generous. A timeout still maps to
    /// `ServiceUnavailable` like any network failure.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| {
                AppError::ServiceUnavailable(format!("Failed to create IN100 client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.in100_base_url.clone(),
            auth: config.auth.clone(),
        })
    }

    /// Whether this deployment must sign in before querying.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self.auth, AuthMode::Credentials { .. })
    }

    /// Acquires a bearer token from the sign-in collaborator.
    ///
    /// Any failure here is `AuthUnavailable`: the balance query is never
    /// sent unauthenticated.
    pub async fn sign_in(&self) -> Result<String, AppError> {
        let url = format!("{}/v3/auth/sign-in", self.base_url);
        let AuthMode::Credentials {
            ref access_id,
            ref password,
        } = self.auth
        else {
            return Err(AppError::AuthUnavailable(
                "sign-in requested but deployment uses an API key".to_string(),
            ));
        };

        tracing::info!("Acquiring IN100 token for {}", access_id);

        let body = json!({
            "accessId": access_id,
            "password": password,
            "authKey": "",
            "type": "",
            "stayConnected": false,
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AuthUnavailable(format!("sign-in request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::AuthUnavailable(format!(
                "sign-in returned {}: {}",
                status, error_text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::AuthUnavailable(format!("invalid sign-in response: {}", e)))?;

        payload
            .get("token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .ok_or_else(|| {
                AppError::AuthUnavailable("sign-in response missing 'token' field".to_string())
            })
    }

    /// Submits the balance query and interprets the HTTP outcome.
    ///
    /// * 200 / other 2xx with body → [`LookupOutcome::Record`]
    /// * 204 or empty body → [`LookupOutcome::Empty`]
    /// * 400, or a body whose `name` is explicitly null → `NotFound`
    /// * 5xx, other non-2xx, network failure or timeout → `ServiceUnavailable`
    pub async fn query_balances(
        &self,
        request: &QueryRequest,
        token: Option<&str>,
    ) -> Result<LookupOutcome, AppError> {
        let url = format!("{}/v3/query-inss-balances/finder/await", self.base_url);
        tracing::info!(
            "Querying IN100 balances for benefit {} ({} attempts)",
            request.benefit_number,
            request.attempts_or_default()
        );

        let body = json!({
            "identity": request.identity,
            "benefitNumber": request.benefit_number,
            "attempts": request.attempts_or_default(),
            "lastDays": request.last_days_or_default(),
        });

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        builder = match (&self.auth, token) {
            (_, Some(token)) => builder.header("Authorization", format!("Bearer {}", token)),
            (AuthMode::ApiKey(key), None) => builder.header("apiKey", key.clone()),
            (AuthMode::Credentials { .. }, None) => {
                // Hard precondition: never send an unauthenticated query.
                return Err(AppError::AuthUnavailable(
                    "no bearer token acquired before query".to_string(),
                ));
            }
        };

        let response = builder.send().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("IN100 request failed: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(LookupOutcome::Empty);
        }
        if status == StatusCode::BAD_REQUEST {
            return Err(AppError::NotFound(
                "benefit record not found (400)".to_string(),
            ));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ServiceUnavailable(format!(
                "IN100 returned {}: {}",
                status, error_text
            )));
        }

        let text = response.text().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("failed to read IN100 response: {}", e))
        })?;
        if text.trim().is_empty() {
            return Ok(LookupOutcome::Empty);
        }

        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            AppError::ServiceUnavailable(format!("malformed IN100 response: {}", e))
        })?;

        // The API signals "no such record" as 200 with an explicitly null name.
        if payload.get("name").map(Value::is_null).unwrap_or(false) {
            return Err(AppError::NotFound(
                "benefit record not found (null name)".to_string(),
            ));
        }

        let record: RawBenefitRecord = serde_json::from_value(payload).map_err(|e| {
            AppError::ServiceUnavailable(format!("unexpected IN100 payload shape: {}", e))
        })?;

        tracing::info!("IN100 lookup succeeded (status {})", status);
        Ok(LookupOutcome::Record(Box::new(record)))
    }
}

/// Client for the bank registry enrichment lookup.
pub struct BankRegistryService {
    client: Client,
    base_url: String,
}

impl BankRegistryService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.bank_registry_base_url.clone(),
        }
    }

    /// Resolves a numeric bank code to its registry entry.
    ///
    /// Never raises to the caller: any failure (network, non-success status,
    /// malformed payload) is logged and answered with `None`, and consumers
    /// fall back to displaying the raw code.
    pub async fn fetch_bank(&self, code: &str) -> Option<BankInfo> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }

        let url = format!("{}/api/banks/v1/{}", self.base_url, code);
        tracing::debug!("Fetching bank registry entry: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Bank registry request failed for code {}: {}", code, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Bank registry returned {} for code {}",
                response.status(),
                code
            );
            return None;
        }

        match response.json::<BankInfo>().await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Malformed bank registry payload for code {}: {}", code, e);
                None
            }
        }
    }
}

/// Client for the hosted persistence service (PostgREST-style REST).
pub struct PersistenceService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PersistenceService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.persistence_base_url.clone(),
            api_key: config.persistence_api_key.clone(),
        }
    }

    /// Insert-or-update of the denormalized query row, keyed by
    /// `(numero_beneficio, numero_documento)`.
    ///
    /// Callers treat failures as non-fatal: the query result is displayed
    /// regardless.
    pub async fn upsert(&self, row: &ConsultaRow) -> Result<(), AppError> {
        let url = format!(
            "{}/rest/v1/consultas_inss?on_conflict=numero_beneficio,numero_documento",
            self.base_url
        );
        tracing::info!(
            "Persisting query result for benefit {} / document {}",
            row.numero_beneficio,
            row.numero_documento
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", self.api_key.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("persistence request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "persistence returned {}: {}",
                status, error_text
            )));
        }

        tracing::info!("Query result persisted");
        Ok(())
    }
}

/// Resolves the machine's external IP for the `ip_origem` column.
///
/// Fetched once at startup; any failure falls back to `127.0.0.1` so that
/// persistence never depends on this collaborator.
pub async fn fetch_external_ip(url: Option<&str>) -> String {
    let Some(url) = url else {
        return "127.0.0.1".to_string();
    };

    let result = async {
        let payload: Value = Client::new()
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await?
            .json()
            .await?;
        Ok::<_, reqwest::Error>(payload.get("ip").and_then(|v| v.as_str()).map(String::from))
    }
    .await;

    match result {
        Ok(Some(ip)) => ip,
        Ok(None) => {
            tracing::warn!("IP lookup response missing 'ip' field");
            "127.0.0.1".to_string()
        }
        Err(e) => {
            tracing::warn!("IP lookup failed: {}", e);
            "127.0.0.1".to_string()
        }
    }
}
