pub mod app_config;
pub mod catalog;
pub mod config;
pub mod estimate;
pub mod guard;
pub mod money;
pub mod placeholder;
pub mod pricing;
pub mod seed;
pub mod selection;
pub mod settings;
pub mod summary;
pub mod vendor;

pub use app_config::{AppConfig, Environment};
pub use catalog::{normalize_catalog, Catalog, Product, ProductImage};
pub use config::{load_app_config, load_app_config_from_env};
pub use estimate::{compute_summary, estimate, order_code, Estimate, EstimateResult, Tier};
pub use guard::{validate_for_save, BillingModes, FieldLocks, PricingForm};
pub use money::{format_won, Price};
pub use pricing::{normalize_pricing, PricePair, PricingConfig, PricingField};
pub use selection::{Activation, ProductKey, SelectedItem, SelectionState};
pub use settings::{parse_settings, ImportedSettings, SettingsSnapshot, StorePaths};
pub use summary::SelectionSummary;
pub use vendor::{Category, Vendor};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised while editing or saving the pricing record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("개통비와 1평당 단가(개통단가/시공단가)를 동시에 사용할 수 없습니다. 한쪽을 비워주세요.")]
    BothBillingModes,

    #[error("개통비 또는 1평당 단가(개통단가/시공단가) 중 하나는 입력해 주세요.")]
    NoBillingMode,

    #[error("field {0} is locked by the active billing mode")]
    FieldLocked(PricingField),

    #[error("unknown pricing field: {0}")]
    UnknownField(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("switch gang size must be 1..=6, got {0}")]
    InvalidGangSize(u8),

    #[error("installation area is locked: per-area pricing is not configured")]
    AreaLocked,

    #[error("installation area must be a non-negative number")]
    InvalidArea,

    #[error("unknown vendor: {0}")]
    UnknownVendor(String),

    #[error("invalid product key \"{0}\": expected vendor:productId")]
    InvalidProductKey(String),
}

/// Rejections raised while reading a settings backup file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON 루트가 객체가 아닙니다.")]
    RootNotObject,

    #[error("data.pricing 형식 오류")]
    PricingNotObject,

    #[error("data.catalog.items 형식 오류")]
    ItemsNotObject,

    #[error("지원하지 않는 settings.json 형식입니다.")]
    UnsupportedShape,
}
