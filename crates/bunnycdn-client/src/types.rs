//! Request and response shapes for the BunnyCDN APIs
//!
//! Field names on the wire are PascalCase and case-sensitive; every rename
//! below reproduces the provider's spelling exactly.

use crate::{ClientError, Result};
use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ==================== Zone listings ====================

/// A zone reduced to its name and numeric id.
///
/// Serializes as a single-entry map `{"<name>": <id>}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneRef {
    pub name: String,
    pub id: i64,
}

impl Serialize for ZoneRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.id)?;
        map.end()
    }
}

/// Per-zone summary built from the storage zone listing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StorageZoneSummary {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Storage_Zone_Name")]
    pub storage_zone_name: String,
    #[serde(rename = "Storage_used")]
    pub storage_used: i64,
    /// Hostnames of every pull zone linked to this storage zone
    #[serde(rename = "host_names")]
    pub host_names: Vec<String>,
    /// Names of the linked pull zones
    #[serde(rename = "PullZones")]
    pub pull_zones: Vec<String>,
}

/// Storage zone as returned by `GET storagezone`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct StorageZoneRecord {
    pub id: i64,
    pub name: String,
    pub storage_used: i64,
    pub pull_zones: Vec<LinkedPullZone>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct LinkedPullZone {
    pub name: String,
    pub hostnames: Vec<HostnameRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct HostnameRecord {
    pub value: String,
}

/// Any zone listing entry carrying `Id` and `Name`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ZoneIdentity {
    pub id: i64,
    pub name: String,
}

impl From<ZoneIdentity> for ZoneRef {
    fn from(zone: ZoneIdentity) -> Self {
        Self {
            name: zone.name,
            id: zone.id,
        }
    }
}

impl From<StorageZoneRecord> for StorageZoneSummary {
    fn from(zone: StorageZoneRecord) -> Self {
        let pull_zones = zone.pull_zones.iter().map(|p| p.name.clone()).collect();
        let host_names = zone
            .pull_zones
            .into_iter()
            .flat_map(|p| p.hostnames)
            .map(|h| h.value)
            .collect();

        Self {
            id: zone.id,
            storage_zone_name: zone.name,
            storage_used: zone.storage_used,
            host_names,
            pull_zones,
        }
    }
}

// ==================== Storage zones ====================

/// Request body for creating a storage zone
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewStorageZone {
    /// 3 to 20 ASCII letters or digits
    pub name: String,
    /// Two character main region code
    pub region: String,
    /// Active replication regions
    pub replication_regions: Vec<String>,
}

impl NewStorageZone {
    /// A zone in the default `DE` region without replication
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: "DE".to_string(),
            replication_regions: Vec::new(),
        }
    }

    /// Set the main region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Add a replication region
    pub fn with_replication_region(mut self, region: impl Into<String>) -> Self {
        self.replication_regions.push(region.into());
        self
    }

    /// Check the constraints the provider enforces on name and region
    pub fn validate(&self) -> Result<()> {
        let alphanumeric = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric());

        if !(3..=20).contains(&self.name.len()) || !alphanumeric(&self.name) {
            return Err(ClientError::InvalidArgument(format!(
                "storage zone name must be 3-20 ASCII letters or digits, got {:?}",
                self.name
            )));
        }
        if self.region.len() != 2 || !alphanumeric(&self.region) {
            return Err(ClientError::InvalidArgument(format!(
                "storage zone region must be a 2 character code, got {:?}",
                self.region
            )));
        }
        Ok(())
    }
}

// ==================== Pull zones ====================

/// Pricing tier of a pull zone, sent as its numeric code
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PricingTier {
    #[default]
    Standard = 0,
    HighVolume = 1,
}

impl Serialize for PricingTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Request body for creating a pull zone
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewPullZone {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "OriginUrl")]
    pub origin_url: String,
    #[serde(rename = "Type")]
    pub pricing_tier: PricingTier,
    /// Storage zone to serve from instead of the origin URL
    #[serde(rename = "StorageZoneId", skip_serializing_if = "Option::is_none")]
    pub storage_zone_id: Option<i64>,
}

impl NewPullZone {
    /// A standard tier pull zone in front of `origin_url`
    pub fn new(name: impl Into<String>, origin_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin_url: origin_url.into(),
            pricing_tier: PricingTier::Standard,
            storage_zone_id: None,
        }
    }

    /// Set the pricing tier
    pub fn with_pricing_tier(mut self, tier: PricingTier) -> Self {
        self.pricing_tier = tier;
        self
    }

    /// Link a storage zone
    pub fn with_storage_zone(mut self, storage_zone_id: i64) -> Self {
        self.storage_zone_id = Some(storage_zone_id);
        self
    }
}

/// Full settings payload for `POST pullzone/{id}`.
///
/// The provider expects every field on each update, so none of them are
/// optional here. Start from a [`Default`] value and overwrite what matters.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullZoneSettings {
    // Origin
    pub origin_url: String,
    pub add_host_header: bool,
    pub follow_redirects: bool,
    #[serde(rename = "VerifyOriginSSL")]
    pub verify_origin_ssl: bool,

    // Access control
    pub allowed_referrers: Vec<String>,
    pub blocked_referrers: Vec<String>,
    pub blocked_ips: Vec<String>,
    pub blocked_countries: Vec<String>,
    pub budget_redirected_countries: Vec<String>,
    pub block_root_path_access: bool,
    pub block_post_requests: bool,
    pub enable_access_control_origin_header: bool,
    pub access_control_origin_header_extensions: Vec<String>,

    // Geo routing
    #[serde(rename = "EnableGeoZoneUS")]
    pub enable_geo_zone_us: bool,
    #[serde(rename = "EnableGeoZoneEU")]
    pub enable_geo_zone_eu: bool,
    #[serde(rename = "EnableGeoZoneASIA")]
    pub enable_geo_zone_asia: bool,
    #[serde(rename = "EnableGeoZoneSA")]
    pub enable_geo_zone_sa: bool,
    #[serde(rename = "EnableGeoZoneAF")]
    pub enable_geo_zone_af: bool,

    // Token authentication
    pub zone_security_enabled: bool,
    #[serde(rename = "ZoneSecurityIncludeHashRemoteIP")]
    pub zone_security_include_hash_remote_ip: bool,

    // Caching
    pub ignore_query_strings: bool,
    pub enable_query_string_ordering: bool,
    pub enable_webp_vary: bool,
    pub enable_avif_vary: bool,
    pub enable_mobile_vary: bool,
    pub enable_country_code_vary: bool,
    pub enable_hostname_vary: bool,
    pub enable_cookie_vary: bool,
    pub cookie_vary_parameters: Vec<String>,
    pub disable_cookies: bool,
    pub cache_control_max_age_override: i64,
    pub cache_control_browser_max_age_override: i64,
    pub cache_error_responses: bool,
    pub enable_cache_slice: bool,
    pub enable_smart_cache: bool,
    pub add_canonical_header: bool,
    pub monthly_bandwidth_limit: u64,

    // Logging
    pub enable_logging: bool,
    #[serde(rename = "LoggingIPAnonymizationEnabled")]
    pub logging_ip_anonymization_enabled: bool,
    pub logging_save_to_storage: bool,
    pub logging_storage_zone_id: i64,

    // Origin shield
    pub enable_origin_shield: bool,
    pub origin_shield_zone_code: String,

    // TLS
    #[serde(rename = "EnableTLS1")]
    pub enable_tls1: bool,
    #[serde(rename = "EnableTLS1_1")]
    pub enable_tls1_1: bool,

    // AWS signing
    #[serde(rename = "AWSSigningEnabled")]
    pub aws_signing_enabled: bool,
    #[serde(rename = "AWSSigningKey")]
    pub aws_signing_key: String,
    #[serde(rename = "AWSSigningSecret")]
    pub aws_signing_secret: String,
    #[serde(rename = "AWSSigningRegionName")]
    pub aws_signing_region_name: String,

    // Error pages
    pub error_page_enable_custom_code: bool,
    pub error_page_custom_code: String,
    pub error_page_whitelabel: bool,
}

// ==================== Edge rules ====================

/// How the triggers of an edge rule are combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriggerMatchingType {
    #[default]
    Any = 0,
    All = 1,
    None = 2,
}

impl Serialize for TriggerMatchingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A single condition of an edge rule
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EdgeRuleTrigger {
    /// Trigger type code (0 = URL, 1 = request header, 2 = response header, ...)
    #[serde(rename = "Type")]
    pub trigger_type: u8,
    pub pattern_matches: Vec<String>,
    /// 0 = any, 1 = all, 2 = none
    pub pattern_matching_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter1: Option<String>,
}

/// Edge rule body for `POST pullzone/{id}/edgerules/addOrUpdate`.
///
/// Without a `guid` the provider creates a new rule; with one it updates
/// the existing rule. Nothing else in the body differs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EdgeRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Action code (0 = force SSL, 1 = redirect, 2 = change origin, ...)
    pub action_type: u8,
    pub action_parameter1: String,
    pub action_parameter2: String,
    pub triggers: Vec<EdgeRuleTrigger>,
    pub trigger_matching_type: TriggerMatchingType,
    pub description: String,
    pub enabled: bool,
}

impl EdgeRule {
    /// Target an existing rule
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    /// Whether this body updates an existing rule
    pub fn is_update(&self) -> bool {
        self.guid.is_some()
    }
}

// ==================== Statistics ====================

/// Query for `GET statistics`; unset filters are left out of the query string
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_zone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_zone_id: Option<i64>,
    pub load_errors: bool,
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self {
            date_from: None,
            date_to: None,
            pull_zone: None,
            server_zone_id: None,
            load_errors: true,
        }
    }
}

impl StatsQuery {
    /// Restrict to a date range
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Restrict to one pull zone
    pub fn for_pull_zone(mut self, pull_zone_id: i64) -> Self {
        self.pull_zone = Some(pull_zone_id);
        self
    }

    /// Restrict to one server zone
    pub fn for_server_zone(mut self, server_zone_id: i64) -> Self {
        self.server_zone_id = Some(server_zone_id);
        self
    }

    /// Toggle error statistics
    pub fn with_load_errors(mut self, load_errors: bool) -> Self {
        self.load_errors = load_errors;
        self
    }
}

// ==================== Storage objects ====================

/// A directory listing entry: `{"File_Name": ..}` or `{"Folder_Name": ..}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StorageEntry {
    #[serde(rename = "File_Name")]
    File(String),
    #[serde(rename = "Folder_Name")]
    Folder(String),
}

impl StorageEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::File(name) | Self::Folder(name) => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

/// An object in a storage zone, with the metadata the provider reports
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "PascalCase"), default)]
pub struct StorageObject {
    pub guid: String,
    pub storage_zone_name: String,
    pub path: String,
    pub object_name: String,
    pub length: u64,
    pub last_changed: String,
    pub server_id: i64,
    pub array_number: i64,
    pub is_directory: bool,
    pub user_id: String,
    pub content_type: String,
    pub date_created: String,
    pub storage_zone_id: i64,
    pub checksum: Option<String>,
    pub replicated_zones: Option<String>,
}

impl StorageObject {
    /// Reduce to a plain listing entry
    pub fn entry(&self) -> StorageEntry {
        if self.is_directory {
            StorageEntry::Folder(self.object_name.clone())
        } else {
            StorageEntry::File(self.object_name.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zone_ref_serializes_as_name_to_id() {
        let zones = vec![
            ZoneRef { name: "assets".into(), id: 11 },
            ZoneRef { name: "backups".into(), id: 12 },
        ];
        assert_eq!(
            serde_json::to_value(&zones).unwrap(),
            json!([{"assets": 11}, {"backups": 12}])
        );
    }

    #[test]
    fn test_storage_zone_summary_collects_all_hostnames() {
        let record: StorageZoneRecord = serde_json::from_value(json!({
            "Id": 5,
            "Name": "assets",
            "StorageUsed": 2048,
            "PullZones": [
                {
                    "Name": "web",
                    "Hostnames": [{"Value": "web.b-cdn.net"}, {"Value": "cdn.example.com"}]
                },
                {"Name": "img", "Hostnames": [{"Value": "img.b-cdn.net"}]}
            ]
        }))
        .unwrap();

        let summary = StorageZoneSummary::from(record);
        assert_eq!(summary.pull_zones, vec!["web", "img"]);
        assert_eq!(
            summary.host_names,
            vec!["web.b-cdn.net", "cdn.example.com", "img.b-cdn.net"]
        );
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({
                "Id": 5,
                "Storage_Zone_Name": "assets",
                "Storage_used": 2048,
                "host_names": ["web.b-cdn.net", "cdn.example.com", "img.b-cdn.net"],
                "PullZones": ["web", "img"]
            })
        );
    }

    #[test]
    fn test_new_storage_zone_validation() {
        assert!(NewStorageZone::new("assets2024").validate().is_ok());
        assert!(NewStorageZone::new("ab").validate().is_err());
        assert!(NewStorageZone::new("a".repeat(21)).validate().is_err());
        assert!(NewStorageZone::new("my-zone").validate().is_err());
        assert!(NewStorageZone::new("assets").with_region("NYC").validate().is_err());
        assert!(NewStorageZone::new("assets").with_region("NY").validate().is_ok());
    }

    #[test]
    fn test_new_pull_zone_body() {
        let body = NewPullZone::new("site", "https://origin.example.com")
            .with_pricing_tier(PricingTier::HighVolume);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"Name": "site", "OriginUrl": "https://origin.example.com", "Type": 1})
        );

        let linked = NewPullZone::new("site", "").with_storage_zone(42);
        assert_eq!(serde_json::to_value(&linked).unwrap()["StorageZoneId"], 42);
        assert_eq!(serde_json::to_value(&linked).unwrap()["Type"], 0);
    }

    #[test]
    fn test_pull_zone_settings_wire_names() {
        let value = serde_json::to_value(PullZoneSettings::default()).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "OriginUrl",
            "EnableGeoZoneUS",
            "EnableGeoZoneASIA",
            "ZoneSecurityIncludeHashRemoteIP",
            "LoggingIPAnonymizationEnabled",
            "EnableTLS1",
            "EnableTLS1_1",
            "AWSSigningEnabled",
            "AWSSigningRegionName",
            "VerifyOriginSSL",
            "CacheControlBrowserMaxAgeOverride",
            "ErrorPageWhitelabel",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        // Every field is always sent
        assert!(object.values().all(|v| !v.is_null()));
        assert!(object.len() >= 40);
    }

    #[test]
    fn test_edge_rule_guid_only_on_update() {
        let rule = EdgeRule {
            action_type: 1,
            action_parameter1: "https://example.com".into(),
            triggers: vec![EdgeRuleTrigger {
                pattern_matches: vec!["*/old/*".into()],
                ..Default::default()
            }],
            description: "redirect old paths".into(),
            enabled: true,
            ..Default::default()
        };

        let create = serde_json::to_value(&rule).unwrap();
        assert!(create.get("Guid").is_none());
        assert_eq!(create["ActionParameter1"], "https://example.com");
        assert_eq!(create["Triggers"][0]["Type"], 0);
        assert_eq!(create["TriggerMatchingType"], 0);

        let update = serde_json::to_value(rule.with_guid("abc-123")).unwrap();
        assert_eq!(update["Guid"], "abc-123");
    }

    #[test]
    fn test_storage_object_entry() {
        let object: StorageObject = serde_json::from_value(json!({
            "Guid": "g-1",
            "ObjectName": "sub",
            "IsDirectory": true,
            "Length": 0
        }))
        .unwrap();

        assert_eq!(object.entry(), StorageEntry::Folder("sub".into()));
        assert_eq!(
            serde_json::to_value(StorageEntry::File("a.txt".into())).unwrap(),
            json!({"File_Name": "a.txt"})
        );
    }
}
