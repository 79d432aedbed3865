//! Account management API client

use crate::{
    endpoint::{single_segment, UrlBuilder},
    http::{self, envelope},
    types::*,
    ApiResult, ClientError, Envelope, ManagementConfig, Result,
};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for `https://bunnycdn.com/api/`, authenticated with the account API key.
///
/// Every method issues a single request. Remote failures come back as
/// [`ApiFailure`](crate::ApiFailure) values, never as panics or hard errors.
#[derive(Clone)]
pub struct ManagementClient {
    urls: UrlBuilder,
    http: Client,
}

impl std::fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementClient")
            .field("base_url", &self.urls.base().as_str())
            .finish()
    }
}

impl ManagementClient {
    /// Create a new client. Fails if the API key is empty.
    pub fn new(config: ManagementConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Config(
                "api_key for the account must be specified".to_string(),
            ));
        }

        let urls = UrlBuilder::new(&config.endpoint)?;

        let mut access_key = header::HeaderValue::from_str(&config.api_key).map_err(|_| {
            ClientError::Config("api_key is not a valid header value".to_string())
        })?;
        access_key.set_sensitive(true);

        let user_agent = header::HeaderValue::from_str(&config.user_agent).map_err(|_| {
            ClientError::Config("user_agent is not a valid header value".to_string())
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert("AccessKey", access_key);
        headers.insert(header::USER_AGENT, user_agent);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        debug!(base_url = %urls.base(), "management client ready");
        Ok(Self { urls, http })
    }

    /// Create with the default endpoint and the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ManagementConfig::new(api_key))
    }

    /// Base URL every path is joined onto
    pub fn base_url(&self) -> &str {
        self.urls.base().as_str()
    }

    // ==================== Certificates & IP blocking ====================

    /// Add a custom certificate to a hostname of a pull zone.
    ///
    /// `certificate` and `certificate_key` are base64 encoded file contents.
    #[instrument(skip(self, certificate, certificate_key))]
    pub async fn add_certificate(
        &self,
        pull_zone_id: i64,
        hostname: &str,
        certificate: &str,
        certificate_key: &str,
    ) -> ApiResult<Envelope> {
        let body = CertificateRequest {
            pull_zone_id,
            hostname,
            certificate,
            certificate_key,
        };
        let request = self
            .request(Method::POST, "pullzone/addCertificate")
            .json(&body);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!(
                "Certificate added successfully to PullZoneId:{},Hostname:{}",
                pull_zone_id, hostname
            ),
        ))
    }

    /// Block an IP from accessing a pull zone
    #[instrument(skip(self))]
    pub async fn add_blocked_ip(
        &self,
        pull_zone_id: i64,
        blocked_ip: &str,
    ) -> ApiResult<Envelope> {
        let body = BlockedIpRequest {
            pull_zone_id,
            blocked_ip,
        };
        let request = self
            .request(Method::POST, "pullzone/addBlockedIp")
            .json(&body);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!(
                "Ip successfully added to list of blocked IPs for pullzone id: {}",
                pull_zone_id
            ),
        ))
    }

    /// Remove an IP from the block list of a pull zone
    #[instrument(skip(self))]
    pub async fn remove_blocked_ip(
        &self,
        pull_zone_id: i64,
        blocked_ip: &str,
    ) -> ApiResult<Envelope> {
        let body = BlockedIpRequest {
            pull_zone_id,
            blocked_ip,
        };
        let request = self
            .request(Method::POST, "pullzone/removeBlockedIp")
            .json(&body);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!(
                "Ip successfully removed from list of blocked IPs for pullzone id: {}",
                pull_zone_id
            ),
        ))
    }

    // ==================== Storage zones ====================

    /// Names and ids of every storage zone in the account
    #[instrument(skip(self))]
    pub async fn storage_zone_list(&self) -> ApiResult<Vec<ZoneRef>> {
        let response = http::send(self.request(Method::GET, "storagezone")).await?;
        let zones: Vec<ZoneIdentity> = http::json(response).await?;
        Ok(zones.into_iter().map(ZoneRef::from).collect())
    }

    /// Usage and linked hostnames of every storage zone
    #[instrument(skip(self))]
    pub async fn storage_zone_data(&self) -> ApiResult<Vec<StorageZoneSummary>> {
        let response = http::send(self.request(Method::GET, "storagezone")).await?;
        let zones: Vec<StorageZoneRecord> = http::json(response).await?;
        Ok(zones.into_iter().map(StorageZoneSummary::from).collect())
    }

    /// Create a storage zone.
    ///
    /// Name and region are checked locally first; a violation is returned
    /// as [`ClientError::InvalidArgument`] and nothing is sent.
    #[instrument(skip(self))]
    pub async fn add_storage_zone(
        &self,
        zone: &NewStorageZone,
    ) -> Result<ApiResult<Envelope<Value>>> {
        zone.validate()?;
        Ok(self.create_storage_zone(zone).await)
    }

    async fn create_storage_zone(&self, zone: &NewStorageZone) -> ApiResult<Envelope<Value>> {
        let response = http::send(self.request(Method::POST, "storagezone").json(zone)).await?;
        let http_status = response.status().as_u16();
        let created: Value = http::json(response).await?;
        Ok(Envelope::new(http_status, created))
    }

    /// Details of one storage zone, as returned by the provider
    #[instrument(skip(self))]
    pub async fn get_storage_zone(&self, storage_zone_id: i64) -> ApiResult<Value> {
        let path = format!("storagezone/{}", storage_zone_id);
        let response = http::send(self.request(Method::GET, &path)).await?;
        http::json(response).await
    }

    /// Delete a storage zone; the message carries whatever JSON the
    /// provider answers with, or `null` for an empty body
    #[instrument(skip(self))]
    pub async fn delete_storage_zone(&self, storage_zone_id: i64) -> ApiResult<Envelope<Value>> {
        let path = format!("storagezone/{}", storage_zone_id);
        let response = http::send(self.request(Method::DELETE, &path)).await?;
        let http_status = response.status().as_u16();
        let body = http::json_or_null(response).await?;
        Ok(Envelope::new(http_status, body))
    }

    // ==================== Purge, billing & statistics ====================

    /// Purge one CDN URL, e.g. `https://myzone.b-cdn.net/style.css`
    #[instrument(skip(self))]
    pub async fn purge_url_cache(&self, url: &str) -> ApiResult<Envelope> {
        let request = self.request(Method::POST, "purge").query(&[("url", url)]);
        let response = http::send(request).await?;
        Ok(envelope(&response, format!("Purged Cache for url:{}", url)))
    }

    /// Current billing summary
    #[instrument(skip(self))]
    pub async fn billing(&self) -> ApiResult<Value> {
        let response = http::send(self.request(Method::GET, "billing")).await?;
        http::json(response).await
    }

    /// Apply a promo code to the account
    #[instrument(skip(self))]
    pub async fn apply_code(&self, coupon_code: &str) -> ApiResult<Envelope> {
        let request = self
            .request(Method::GET, "billing/applycode")
            .query(&[("couponCode", coupon_code)]);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!("Applied promo code:{} successfully", coupon_code),
        ))
    }

    /// Account statistics
    #[instrument(skip(self))]
    pub async fn stats(&self, query: &StatsQuery) -> ApiResult<Value> {
        let response = http::send(self.request(Method::GET, "statistics").query(query)).await?;
        http::json(response).await
    }

    // ==================== Pull zones ====================

    /// Names and ids of every pull zone in the account
    #[instrument(skip(self))]
    pub async fn get_pull_zone_list(&self) -> ApiResult<Vec<ZoneRef>> {
        let response = http::send(self.request(Method::GET, "pullzone")).await?;
        let zones: Vec<ZoneIdentity> = http::json(response).await?;
        Ok(zones.into_iter().map(ZoneRef::from).collect())
    }

    /// Create a pull zone; returns the created zone as the provider reports it
    #[instrument(skip(self))]
    pub async fn create_pull_zone(&self, zone: &NewPullZone) -> ApiResult<Value> {
        let response = http::send(self.request(Method::POST, "pullzone").json(zone)).await?;
        http::json(response).await
    }

    /// Details of one pull zone, as returned by the provider
    #[instrument(skip(self))]
    pub async fn get_pull_zone(&self, pull_zone_id: i64) -> ApiResult<Value> {
        let path = format!("pullzone/{}", pull_zone_id);
        let response = http::send(self.request(Method::GET, &path)).await?;
        http::json(response).await
    }

    /// Delete a pull zone
    #[instrument(skip(self))]
    pub async fn delete_pull_zone(&self, pull_zone_id: i64) -> ApiResult<Envelope> {
        let path = format!("pullzone/{}", pull_zone_id);
        self.remove(&path, format!("Successfully Deleted Pullzone:{}", pull_zone_id))
            .await
    }

    /// Replace the settings of a pull zone. Every field is sent.
    #[instrument(skip(self, settings))]
    pub async fn update_pull_zone(
        &self,
        pull_zone_id: i64,
        settings: &PullZoneSettings,
    ) -> ApiResult<Envelope> {
        let path = format!("pullzone/{}", pull_zone_id);
        let response = http::send(self.request(Method::POST, &path).json(settings)).await?;
        Ok(envelope(
            &response,
            format!("Update successful for pullzone:{}", pull_zone_id),
        ))
    }

    /// Purge the whole cache of a pull zone
    #[instrument(skip(self))]
    pub async fn purge_pull_zone_cache(&self, pull_zone_id: i64) -> ApiResult<Envelope> {
        let path = format!("pullzone/{}/purgeCache", pull_zone_id);
        let response = http::send(self.request(Method::POST, &path)).await?;
        Ok(envelope(
            &response,
            format!("Successfully purged pullzone cache for pullzone:{}", pull_zone_id),
        ))
    }

    // ==================== Edge rules ====================

    /// Create an edge rule, or update it when `rule.guid` is set
    #[instrument(skip(self, rule), fields(update = rule.is_update()))]
    pub async fn add_or_update_edge_rule(
        &self,
        pull_zone_id: i64,
        rule: &EdgeRule,
    ) -> ApiResult<Envelope> {
        let path = format!("pullzone/{}/edgerules/addOrUpdate", pull_zone_id);
        let response = http::send(self.request(Method::POST, &path).json(rule)).await?;
        let message = match &rule.guid {
            Some(guid) => format!("Updated edge rule {} on pullzone:{}", guid, pull_zone_id),
            None => format!("Added edge rule to pullzone:{}", pull_zone_id),
        };
        Ok(envelope(&response, message))
    }

    /// Delete an edge rule.
    ///
    /// `edge_rule_id` must be a single path segment; anything else is a
    /// [`ClientError::InvalidArgument`] and nothing is sent.
    #[instrument(skip(self))]
    pub async fn delete_edge_rule(
        &self,
        pull_zone_id: i64,
        edge_rule_id: &str,
    ) -> Result<ApiResult<Envelope>> {
        let edge_rule_id = single_segment(edge_rule_id, "edge_rule_id")?;
        let path = format!("pullzone/{}/edgerules/{}", pull_zone_id, edge_rule_id);
        Ok(self
            .remove(&path, format!("Successfully deleted edgerule {}", edge_rule_id))
            .await)
    }

    // ==================== Hostnames ====================

    /// Attach a custom hostname to a pull zone
    #[instrument(skip(self))]
    pub async fn add_custom_hostname(
        &self,
        pull_zone_id: i64,
        hostname: &str,
    ) -> ApiResult<Envelope> {
        let body = HostnameRequest {
            pull_zone_id,
            hostname,
        };
        let request = self
            .request(Method::POST, "pullzone/addHostname")
            .json(&body);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!("Custom Hostname {} added to pullzone:{}", hostname, pull_zone_id),
        ))
    }

    /// Detach a custom hostname from a pull zone
    #[instrument(skip(self))]
    pub async fn delete_custom_hostname(
        &self,
        pull_zone_id: i64,
        hostname: &str,
    ) -> ApiResult<Envelope> {
        let id = pull_zone_id.to_string();
        let request = self
            .request(Method::DELETE, "pullzone/deleteHostname")
            .query(&[("id", id.as_str()), ("hostname", hostname)]);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!("Custom Hostname {} deleted from pullzone:{}", hostname, pull_zone_id),
        ))
    }

    /// Toggle forced HTTPS for a hostname
    #[instrument(skip(self))]
    pub async fn set_force_ssl(
        &self,
        pull_zone_id: i64,
        hostname: &str,
        force_ssl: bool,
    ) -> ApiResult<Envelope> {
        let body = ForceSslRequest {
            pull_zone_id,
            hostname,
            force_ssl,
        };
        let request = self
            .request(Method::POST, "pullzone/setForceSSL")
            .json(&body);
        let response = http::send(request).await?;
        Ok(envelope(
            &response,
            format!("ForceSSL set to {} for hostname {}", force_ssl, hostname),
        ))
    }

    /// Ask the provider to issue a free certificate for `hostname`.
    ///
    /// The provider does not confirm the issuance itself; on success the
    /// refreshed pull zone list is returned instead.
    #[instrument(skip(self))]
    pub async fn load_free_certificate(&self, hostname: &str) -> ApiResult<Vec<ZoneRef>> {
        let request = self
            .request(Method::GET, "pullzone/loadFreeCertificate")
            .query(&[("hostname", hostname)]);
        http::send(request).await?;
        self.get_pull_zone_list().await
    }

    // ==================== Helper Methods ====================

    async fn remove(&self, path: &str, message: String) -> ApiResult<Envelope> {
        let response = http::send(self.request(Method::DELETE, path)).await?;
        Ok(envelope(&response, message))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.urls.route(path);
        debug!("Sending {} request to {}", method, url);
        self.http.request(method, url)
    }
}

// ============ Request bodies ============

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CertificateRequest<'a> {
    pull_zone_id: i64,
    hostname: &'a str,
    certificate: &'a str,
    certificate_key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BlockedIpRequest<'a> {
    pull_zone_id: i64,
    blocked_ip: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct HostnameRequest<'a> {
    pull_zone_id: i64,
    hostname: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForceSslRequest<'a> {
    pull_zone_id: i64,
    hostname: &'a str,
    #[serde(rename = "ForceSSL")]
    force_ssl: bool,
}
