//! `settings.json` backup files: building exports and reading imports.
//!
//! Imports accept the versioned export shape and two older shapes, and
//! canonicalize both records before anything is written back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{normalize_catalog, Catalog};
use crate::pricing::{is_truthy, normalize_pricing, PricingConfig};
use crate::SettingsError;

pub const SCHEMA_VERSION: u32 = 1;

/// Store locations of the two records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePaths {
    pub pricing: String,
    pub catalog_items: String,
}

impl StorePaths {
    /// `catalog` is the catalog root; items live under `{catalog}/items`.
    #[must_use]
    pub fn new(pricing: &str, catalog: &str) -> Self {
        let trim = |p: &str| p.trim_matches('/').to_string();
        Self {
            pricing: trim(pricing),
            catalog_items: format!("{}/items", trim(catalog)),
        }
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::new("pricing", "catalog")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub schema_version: u32,
    pub exported_at: String,
    pub firebase_paths: StorePaths,
    pub data: SnapshotData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotData {
    pub pricing: Value,
    pub catalog: SnapshotCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotCatalog {
    pub items: Value,
}

impl SettingsSnapshot {
    /// Bundles the raw stored records; an absent record is exported as `{}`.
    #[must_use]
    pub fn build(
        pricing: Option<Value>,
        items: Option<Value>,
        paths: StorePaths,
        exported_at: DateTime<Utc>,
    ) -> Self {
        let or_empty = |v: Option<Value>| match v {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(v) => v,
        };
        Self {
            schema_version: SCHEMA_VERSION,
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            firebase_paths: paths,
            data: SnapshotData {
                pricing: or_empty(pricing),
                catalog: SnapshotCatalog {
                    items: or_empty(items),
                },
            },
        }
    }

    /// Pretty-printed file contents.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Canonical records recovered from a settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSettings {
    pub pricing: PricingConfig,
    pub catalog: Catalog,
}

impl ImportedSettings {
    #[must_use]
    pub fn pricing_record(&self) -> Value {
        self.pricing.to_record()
    }

    #[must_use]
    pub fn items_record(&self) -> Value {
        Value::Object(self.catalog.to_store_items())
    }
}

/// Parses settings file text.
///
/// # Errors
///
/// Returns [`SettingsError::Json`] for invalid JSON and the shape errors of
/// [`parse_settings_value`].
pub fn parse_settings(text: &str) -> Result<ImportedSettings, SettingsError> {
    let value: Value = serde_json::from_str(text)?;
    parse_settings_value(&value)
}

/// Recognizes one of the supported settings shapes and canonicalizes it.
///
/// Accepted, in order: `{schemaVersion, data: {pricing, catalog: {items}}}`,
/// `{pricing, catalog: {items}}`, `{pricing, catalogItems}`.
///
/// # Errors
///
/// Returns a [`SettingsError`] describing the first shape violation.
pub fn parse_settings_value(value: &Value) -> Result<ImportedSettings, SettingsError> {
    let root = value.as_object().ok_or(SettingsError::RootNotObject)?;
    let empty = Value::Object(Map::new());

    let (pricing, items) = if let Some(data) = root
        .get("schemaVersion")
        .filter(|v| is_truthy(v))
        .and(root.get("data"))
        .and_then(Value::as_object)
    {
        let pricing = data.get("pricing").filter(|v| is_truthy(v)).unwrap_or(&empty);
        let items = data
            .get("catalog")
            .and_then(|c| c.get("items"))
            .filter(|v| is_truthy(v))
            .unwrap_or(&empty);
        if !pricing.is_object() {
            return Err(SettingsError::PricingNotObject);
        }
        if !items.is_object() {
            return Err(SettingsError::ItemsNotObject);
        }
        (pricing, items)
    } else if let (Some(pricing), Some(items)) = (
        root.get("pricing").filter(|v| v.is_object()),
        root.get("catalog")
            .and_then(|c| c.get("items"))
            .filter(|v| v.is_object()),
    ) {
        tracing::debug!("reading settings in {{pricing, catalog.items}} shape");
        (pricing, items)
    } else if let (Some(pricing), Some(items)) = (
        root.get("pricing").filter(|v| v.is_object()),
        root.get("catalogItems").filter(|v| v.is_object()),
    ) {
        tracing::debug!("reading settings in {{pricing, catalogItems}} shape");
        (pricing, items)
    } else {
        return Err(SettingsError::UnsupportedShape);
    };

    Ok(canonicalize(pricing, items))
}

fn canonicalize(pricing: &Value, items: &Value) -> ImportedSettings {
    ImportedSettings {
        pricing: normalize_pricing(Some(pricing)),
        catalog: normalize_catalog(Some(items)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn pricing() -> Value {
        json!({
            "activationFee": { "dealer": 200000, "retail": 244600 },
            "installPerPyeong": { "dealer": "", "retail": "" },
            "constructionPerPyeong": { "dealer": "", "retail": "" },
            "installCostPerItem": {
                "main": { "dealer": "", "retail": "" },
                "recess": { "dealer": 4000, "retail": 5000 },
                "line": { "dealer": "", "retail": "" }
            },
            "switchGang": { "dealer": 45400, "retail": 55600 },
            "thirdPartyGang": { "dealer": 15000, "retail": 20000 },
            "updatedAt": 1_717_000_000_000_i64
        })
    }

    fn items() -> Value {
        json!({
            "p1": {
                "vendor": "zibis", "category": "라인등", "name": "Line",
                "prices": { "dealer": 1000, "retail": 2000 },
                "image": null, "orderCode": "ZL-1", "updatedAt": 1_717_000_000_001_i64
            }
        })
    }

    #[test]
    fn store_paths_append_items() {
        let paths = StorePaths::new("/prices/", "shop/catalog");
        assert_eq!(paths.pricing, "prices");
        assert_eq!(paths.catalog_items, "shop/catalog/items");
        assert_eq!(StorePaths::default().catalog_items, "catalog/items");
    }

    #[test]
    fn snapshot_has_versioned_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single().expect("valid date");
        let snapshot = SettingsSnapshot::build(Some(pricing()), None, StorePaths::default(), at);
        let value = serde_json::to_value(&snapshot).expect("serializable");
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["exportedAt"], "2024-05-01T09:30:00.000Z");
        assert_eq!(value["firebasePaths"]["catalogItems"], "catalog/items");
        assert_eq!(value["data"]["catalog"]["items"], json!({}));
        assert_eq!(value["data"]["pricing"], pricing());
    }

    #[test]
    fn export_then_import_is_lossless_for_canonical_records() {
        let snapshot = SettingsSnapshot::build(
            Some(pricing()),
            Some(items()),
            StorePaths::default(),
            Utc::now(),
        );
        let text = snapshot.to_json_pretty().expect("serializable");
        let imported = parse_settings(&text).expect("own export parses");
        assert_eq!(imported.pricing_record(), pricing());
        assert_eq!(imported.items_record(), items());
    }

    #[test]
    fn legacy_catalog_shape_is_accepted() {
        let raw = json!({ "pricing": pricing(), "catalog": { "items": items() } });
        let imported = parse_settings_value(&raw).expect("legacy shape");
        assert_eq!(imported.catalog.len(), 1);
    }

    #[test]
    fn legacy_catalog_items_shape_is_accepted() {
        let raw = json!({ "pricing": pricing(), "catalogItems": items() });
        let imported = parse_settings_value(&raw).expect("legacy shape");
        assert_eq!(imported.items_record(), items());
    }

    #[test]
    fn legacy_pricing_columns_are_canonicalized() {
        let raw = json!({
            "pricing": { "activationFee": { "A": 1, "B": 2 } },
            "catalogItems": {}
        });
        let imported = parse_settings_value(&raw).expect("legacy shape");
        assert_eq!(imported.pricing_record()["activationFee"], json!({ "dealer": 1, "retail": 2 }));
    }

    #[test]
    fn missing_data_members_default_to_empty() {
        let raw = json!({ "schemaVersion": 1, "data": {} });
        let imported = parse_settings_value(&raw).expect("empty data");
        assert!(imported.catalog.is_empty());
        assert_eq!(imported.pricing, PricingConfig::builtin_default());
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = parse_settings("[1,2]").unwrap_err();
        assert!(matches!(err, SettingsError::RootNotObject));
        assert_eq!(err.to_string(), "JSON 루트가 객체가 아닙니다.");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            parse_settings("{not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn wrong_typed_data_members_are_rejected() {
        let raw = json!({ "schemaVersion": 1, "data": { "pricing": "x" } });
        assert!(matches!(
            parse_settings_value(&raw),
            Err(SettingsError::PricingNotObject)
        ));
        let raw = json!({ "schemaVersion": 1, "data": { "catalog": { "items": [1] } } });
        assert!(matches!(
            parse_settings_value(&raw),
            Err(SettingsError::ItemsNotObject)
        ));
    }

    #[test]
    fn unrecognized_shape_is_rejected() {
        let raw = json!({ "pricing": pricing() });
        assert!(matches!(
            parse_settings_value(&raw),
            Err(SettingsError::UnsupportedShape)
        ));
        let raw = json!({ "schemaVersion": 0, "data": {} });
        assert!(matches!(
            parse_settings_value(&raw),
            Err(SettingsError::UnsupportedShape)
        ));
    }
}
