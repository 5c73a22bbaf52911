use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{DnsUpdateResult, RecordType, UpdateAction};
use crate::config::UpdateConfig;
use crate::error::UpdateError;
use crate::fqdn::resolve_fqdn;

/// Looks up the zone and record, then overwrites the record or, with
/// `upsert`, creates it when the lookup comes back empty.
pub async fn update_dns_record(
    client: &CloudflareClient,
    config: &UpdateConfig,
) -> Result<DnsUpdateResult> {
    let zone = client
        .find_zone(&config.domain)
        .await?
        .ok_or_else(|| UpdateError::ZoneNotFound(config.domain.clone()))?;
    debug!("Zone {} resolved to {}", zone.name, zone.id);

    let fqdn = resolve_fqdn(&config.key, &config.domain);
    info!("Searching for {} record {}", config.record_type, fqdn);

    let body = RecordRequest {
        record_type: config.record_type,
        name: &fqdn,
        content: &config.content,
        ttl: config.ttl,
        proxied: config.proxied,
        comment: config.comment.as_deref(),
    };

    match client.find_record(&zone.id, config.record_type, &fqdn).await? {
        Some(existing) => {
            info!(
                "Updating existing record {} from {} to {}",
                fqdn, existing.content, config.content
            );
            let record = client.update_record(&zone.id, &existing.id, &body).await?;

            Ok(DnsUpdateResult {
                action: UpdateAction::Updated,
                name: fqdn,
                content: config.content.clone(),
                record_id: Some(record.map_or(existing.id, |r| r.id)),
            })
        }
        None if config.upsert => {
            info!("Creating new record {} with {}", fqdn, config.content);
            let record = client.create_record(&zone.id, &body).await?;

            Ok(DnsUpdateResult {
                action: UpdateAction::Created,
                name: fqdn,
                content: config.content.clone(),
                record_id: record.map(|r| r.id),
            })
        }
        None => Err(UpdateError::RecordNotFound(fqdn).into()),
    }
}

pub struct CloudflareClient {
    client: Client,
    api_base: String,
    api_token: String,
}

impl CloudflareClient {
    pub fn new(api_base: &str, api_token: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// Returns the first zone Cloudflare lists for `domain`. When several
    /// match, the provider's ordering decides.
    pub async fn find_zone(&self, domain: &str) -> Result<Option<Zone>> {
        let zones: Vec<Zone> = self.get_list("/zones", &[("name", domain)]).await?;
        Ok(zones.into_iter().next())
    }

    /// Returns the first record of `record_type` named `fqdn` in the zone.
    /// Ties are broken the same way as [`CloudflareClient::find_zone`].
    pub async fn find_record(
        &self,
        zone_id: &str,
        record_type: RecordType,
        fqdn: &str,
    ) -> Result<Option<DnsRecord>> {
        let path = format!("/zones/{}/dns_records", zone_id);
        let records: Vec<DnsRecord> = self
            .get_list(&path, &[("type", record_type.as_str()), ("name", fqdn)])
            .await?;
        Ok(records.into_iter().next())
    }

    pub async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        body: &RecordRequest<'_>,
    ) -> Result<Option<DnsRecord>> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        self.send_record(Method::PUT, &path, body).await
    }

    pub async fn create_record(
        &self,
        zone_id: &str,
        body: &RecordRequest<'_>,
    ) -> Result<Option<DnsRecord>> {
        let path = format!("/zones/{}/dns_records", zone_id);
        self.send_record(Method::POST, &path, body).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
    }

    // HTTP status is not checked: an empty `result` means "not found".
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .context("Failed to send request to Cloudflare")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read Cloudflare response")?;
        debug!("GET {} -> {}: {}", path, status, text);

        let parsed: CloudflareListResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse Cloudflare response: {}", text))?;

        if parsed.success == Some(false) && !parsed.errors.is_empty() {
            warn!("Cloudflare API error: {}", join_errors(&parsed.errors));
        }

        Ok(parsed.result.unwrap_or_default())
    }

    async fn send_record(
        &self,
        method: Method,
        path: &str,
        body: &RecordRequest<'_>,
    ) -> Result<Option<DnsRecord>> {
        debug!("{} {}", method, path);

        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .context("Failed to send request to Cloudflare")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read Cloudflare response")?;
        debug!("Response {}: {}", status, text);

        let parsed = serde_json::from_str::<CloudflareResponse>(&text).ok();

        if !status.is_success() {
            let message = match &parsed {
                Some(parsed) if !parsed.errors.is_empty() => join_errors(&parsed.errors),
                _ => text,
            };
            return Err(UpdateError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        match parsed {
            Some(parsed) if parsed.success == Some(false) => Err(UpdateError::Rejected {
                status: status.as_u16(),
                message: join_errors(&parsed.errors),
            }
            .into()),
            Some(parsed) => Ok(parsed.result),
            None => Ok(None),
        }
    }
}

fn join_errors(errors: &[CloudflareError]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// Cloudflare API types

/// Body of a PUT or POST. Every writable field is sent, so an update fully
/// replaces the record rather than patching it.
#[derive(Debug, Serialize)]
pub struct RecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: i16,
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudflareResponse {
    success: Option<bool>,
    #[serde(default)]
    errors: Vec<CloudflareError>,
    result: Option<DnsRecord>,
}

#[derive(Debug, Deserialize)]
struct CloudflareListResponse<T> {
    success: Option<bool>,
    #[serde(default)]
    errors: Vec<CloudflareError>,
    result: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}
