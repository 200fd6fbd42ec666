//! Canonical pricing configuration and the normalizer that reads it from
//! either stored schema.
//!
//! The store has carried two shapes over time. The current one keeps a
//! `{dealer, retail}` pair per field. The legacy one used four-letter columns
//! where `A`/`C` held the dealer price and `B`/`D` the retail price. Both are
//! classified once at the boundary by [`RawPricing::classify`] and converted to
//! [`PricingConfig`]; nothing downstream looks at raw shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::estimate::Tier;
use crate::money::{price_from_value, price_serde, Price};
use crate::vendor::SurchargeKey;
use crate::PricingError;

/// A dealer/retail price pair. Either side may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    #[serde(with = "price_serde", default)]
    pub dealer: Price,
    #[serde(with = "price_serde", default)]
    pub retail: Price,
}

impl PricePair {
    pub const UNSET: PricePair = PricePair {
        dealer: None,
        retail: None,
    };

    #[must_use]
    pub fn new(dealer: impl Into<Decimal>, retail: impl Into<Decimal>) -> Self {
        Self {
            dealer: Some(dealer.into()),
            retail: Some(retail.into()),
        }
    }

    #[must_use]
    pub fn get(&self, tier: Tier) -> Price {
        match tier {
            Tier::Dealer => self.dealer,
            Tier::Retail => self.retail,
        }
    }

    pub fn set(&mut self, tier: Tier, price: Price) {
        match tier {
            Tier::Dealer => self.dealer = price,
            Tier::Retail => self.retail = price,
        }
    }

    /// `true` when either tier is a configured amount above zero.
    #[must_use]
    pub fn any_positive(&self) -> bool {
        crate::money::is_positive(self.dealer) || crate::money::is_positive(self.retail)
    }

    /// Reads a current-schema `{dealer, retail}` object; missing leaves are unset.
    pub(crate) fn from_current(raw: Option<&Value>) -> Self {
        let leaf = |key: &str| raw.and_then(|v| v.get(key)).and_then(price_from_value);
        Self {
            dealer: leaf("dealer"),
            retail: leaf("retail"),
        }
    }

    /// Reads a legacy column object: `A` then `C` for dealer, `B` then `D` for retail.
    fn from_legacy(raw: Option<&Value>) -> Self {
        let first_present = |keys: [&str; 2]| {
            keys.iter()
                .find_map(|k| raw.and_then(|v| v.get(*k)).filter(|v| !v.is_null()))
                .and_then(price_from_value)
        };
        Self {
            dealer: first_present(["A", "C"]),
            retail: first_present(["B", "D"]),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCostPerItem {
    #[serde(default)]
    pub main: PricePair,
    #[serde(default)]
    pub recess: PricePair,
    #[serde(default)]
    pub line: PricePair,
}

impl InstallCostPerItem {
    #[must_use]
    pub fn get(&self, key: SurchargeKey) -> &PricePair {
        match key {
            SurchargeKey::Main => &self.main,
            SurchargeKey::Recess => &self.recess,
            SurchargeKey::Line => &self.line,
        }
    }

    pub fn get_mut(&mut self, key: SurchargeKey) -> &mut PricePair {
        match key {
            SurchargeKey::Main => &mut self.main,
            SurchargeKey::Recess => &mut self.recess,
            SurchargeKey::Line => &mut self.line,
        }
    }
}

/// The singleton pricing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    #[serde(default)]
    pub activation_fee: PricePair,
    #[serde(default)]
    pub install_per_pyeong: PricePair,
    #[serde(default)]
    pub construction_per_pyeong: PricePair,
    #[serde(default)]
    pub install_cost_per_item: InstallCostPerItem,
    #[serde(default)]
    pub switch_gang: PricePair,
    #[serde(default)]
    pub third_party_gang: PricePair,
    /// Server timestamp (epoch millis) of the last write, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl PricingConfig {
    /// Built-in configuration used when the store has no pricing record:
    /// flat activation-fee mode with switch defaults, per-area fields unset.
    #[must_use]
    pub fn builtin_default() -> Self {
        Self {
            activation_fee: PricePair::new(200_000, 244_600),
            install_per_pyeong: PricePair::UNSET,
            construction_per_pyeong: PricePair::UNSET,
            install_cost_per_item: InstallCostPerItem::default(),
            switch_gang: PricePair::new(45_400, 55_600),
            third_party_gang: PricePair::new(15_000, 20_000),
            updated_at: None,
        }
    }

    #[must_use]
    pub fn field(&self, field: PricingField) -> Price {
        let (group, tier) = field.parts();
        self.group(group).get(tier)
    }

    pub fn set_field(&mut self, field: PricingField, price: Price) {
        let (group, tier) = field.parts();
        self.group_mut(group).set(tier, price);
    }

    fn group(&self, group: FieldGroup) -> &PricePair {
        match group {
            FieldGroup::ActivationFee => &self.activation_fee,
            FieldGroup::InstallPerPyeong => &self.install_per_pyeong,
            FieldGroup::ConstructionPerPyeong => &self.construction_per_pyeong,
            FieldGroup::InstallCost(key) => self.install_cost_per_item.get(key),
            FieldGroup::SwitchGang => &self.switch_gang,
            FieldGroup::ThirdPartyGang => &self.third_party_gang,
        }
    }

    fn group_mut(&mut self, group: FieldGroup) -> &mut PricePair {
        match group {
            FieldGroup::ActivationFee => &mut self.activation_fee,
            FieldGroup::InstallPerPyeong => &mut self.install_per_pyeong,
            FieldGroup::ConstructionPerPyeong => &mut self.construction_per_pyeong,
            FieldGroup::InstallCost(key) => self.install_cost_per_item.get_mut(key),
            FieldGroup::SwitchGang => &mut self.switch_gang,
            FieldGroup::ThirdPartyGang => &mut self.third_party_gang,
        }
    }

    /// Serializes to the store record shape (unset leaves as `""`).
    #[must_use]
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldGroup {
    ActivationFee,
    InstallPerPyeong,
    ConstructionPerPyeong,
    InstallCost(SurchargeKey),
    SwitchGang,
    ThirdPartyGang,
}

/// One editable input of the admin pricing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingField {
    ActivationDealer,
    ActivationRetail,
    InstallPerPyeongDealer,
    InstallPerPyeongRetail,
    ConstructionPerPyeongDealer,
    ConstructionPerPyeongRetail,
    MainInstallDealer,
    MainInstallRetail,
    RecessInstallDealer,
    RecessInstallRetail,
    LineInstallDealer,
    LineInstallRetail,
    SwitchGangDealer,
    SwitchGangRetail,
    ThirdPartyGangDealer,
    ThirdPartyGangRetail,
}

impl PricingField {
    pub const ALL: [PricingField; 16] = [
        PricingField::ActivationDealer,
        PricingField::ActivationRetail,
        PricingField::InstallPerPyeongDealer,
        PricingField::InstallPerPyeongRetail,
        PricingField::ConstructionPerPyeongDealer,
        PricingField::ConstructionPerPyeongRetail,
        PricingField::MainInstallDealer,
        PricingField::MainInstallRetail,
        PricingField::RecessInstallDealer,
        PricingField::RecessInstallRetail,
        PricingField::LineInstallDealer,
        PricingField::LineInstallRetail,
        PricingField::SwitchGangDealer,
        PricingField::SwitchGangRetail,
        PricingField::ThirdPartyGangDealer,
        PricingField::ThirdPartyGangRetail,
    ];

    fn parts(self) -> (FieldGroup, Tier) {
        use PricingField as F;
        match self {
            F::ActivationDealer => (FieldGroup::ActivationFee, Tier::Dealer),
            F::ActivationRetail => (FieldGroup::ActivationFee, Tier::Retail),
            F::InstallPerPyeongDealer => (FieldGroup::InstallPerPyeong, Tier::Dealer),
            F::InstallPerPyeongRetail => (FieldGroup::InstallPerPyeong, Tier::Retail),
            F::ConstructionPerPyeongDealer => (FieldGroup::ConstructionPerPyeong, Tier::Dealer),
            F::ConstructionPerPyeongRetail => (FieldGroup::ConstructionPerPyeong, Tier::Retail),
            F::MainInstallDealer => (FieldGroup::InstallCost(SurchargeKey::Main), Tier::Dealer),
            F::MainInstallRetail => (FieldGroup::InstallCost(SurchargeKey::Main), Tier::Retail),
            F::RecessInstallDealer => (FieldGroup::InstallCost(SurchargeKey::Recess), Tier::Dealer),
            F::RecessInstallRetail => (FieldGroup::InstallCost(SurchargeKey::Recess), Tier::Retail),
            F::LineInstallDealer => (FieldGroup::InstallCost(SurchargeKey::Line), Tier::Dealer),
            F::LineInstallRetail => (FieldGroup::InstallCost(SurchargeKey::Line), Tier::Retail),
            F::SwitchGangDealer => (FieldGroup::SwitchGang, Tier::Dealer),
            F::SwitchGangRetail => (FieldGroup::SwitchGang, Tier::Retail),
            F::ThirdPartyGangDealer => (FieldGroup::ThirdPartyGang, Tier::Dealer),
            F::ThirdPartyGangRetail => (FieldGroup::ThirdPartyGang, Tier::Retail),
        }
    }

    /// Dotted record path, e.g. `installCostPerItem.recess.retail`.
    #[must_use]
    pub fn path(self) -> String {
        let (group, tier) = self.parts();
        let group = match group {
            FieldGroup::ActivationFee => "activationFee",
            FieldGroup::InstallPerPyeong => "installPerPyeong",
            FieldGroup::ConstructionPerPyeong => "constructionPerPyeong",
            FieldGroup::InstallCost(SurchargeKey::Main) => "installCostPerItem.main",
            FieldGroup::InstallCost(SurchargeKey::Recess) => "installCostPerItem.recess",
            FieldGroup::InstallCost(SurchargeKey::Line) => "installCostPerItem.line",
            FieldGroup::SwitchGang => "switchGang",
            FieldGroup::ThirdPartyGang => "thirdPartyGang",
        };
        format!("{group}.{tier}")
    }

    /// Activation-mode input (`activationFee.*`).
    #[must_use]
    pub fn is_activation(self) -> bool {
        matches!(self.parts().0, FieldGroup::ActivationFee)
    }

    /// Per-area-mode input (`installPerPyeong.*` or `constructionPerPyeong.*`).
    #[must_use]
    pub fn is_per_area(self) -> bool {
        matches!(
            self.parts().0,
            FieldGroup::InstallPerPyeong | FieldGroup::ConstructionPerPyeong
        )
    }
}

impl std::fmt::Display for PricingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl std::str::FromStr for PricingField {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PricingField::ALL
            .into_iter()
            .find(|f| f.path() == s)
            .ok_or_else(|| PricingError::UnknownField(s.to_string()))
    }
}

/// The shapes a stored pricing value may take.
#[derive(Debug)]
pub enum RawPricing<'a> {
    Absent,
    Current(&'a Map<String, Value>),
    Legacy(&'a Map<String, Value>),
    Unrecognized,
}

const LEGACY_GROUPS: [&str; 3] = ["activationFee", "switchGang", "thirdPartyGang"];
const LEGACY_COLUMNS: [&str; 4] = ["A", "B", "C", "D"];

impl<'a> RawPricing<'a> {
    #[must_use]
    pub fn classify(raw: Option<&'a Value>) -> Self {
        let Some(raw) = raw else {
            return RawPricing::Absent;
        };
        let map = match raw {
            Value::Null => return RawPricing::Absent,
            Value::Object(map) => map,
            _ => return RawPricing::Unrecognized,
        };

        let has_activation_dealer = map
            .get("activationFee")
            .and_then(|v| v.get("dealer"))
            .is_some();
        let has_per_area = ["installPerPyeong", "constructionPerPyeong"]
            .iter()
            .any(|k| map.get(*k).is_some_and(is_truthy));
        if has_activation_dealer || has_per_area {
            return RawPricing::Current(map);
        }

        let has_legacy_columns = LEGACY_GROUPS.iter().any(|group| {
            map.get(*group)
                .and_then(Value::as_object)
                .is_some_and(|cols| LEGACY_COLUMNS.iter().any(|c| cols.contains_key(*c)))
        });
        if has_legacy_columns {
            RawPricing::Legacy(map)
        } else {
            RawPricing::Unrecognized
        }
    }
}

/// JavaScript-style truthiness, which the stored records were written against.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts a raw stored pricing value into a [`PricingConfig`]. Never fails.
#[must_use]
pub fn normalize_pricing(raw: Option<&Value>) -> PricingConfig {
    match RawPricing::classify(raw) {
        RawPricing::Absent => PricingConfig::builtin_default(),
        RawPricing::Unrecognized => {
            tracing::warn!("unrecognized pricing record shape; using built-in defaults");
            PricingConfig::builtin_default()
        }
        RawPricing::Current(map) => {
            let pair = |key: &str| PricePair::from_current(map.get(key));
            let per_item = map.get("installCostPerItem");
            let item = |key: &str| PricePair::from_current(per_item.and_then(|v| v.get(key)));
            PricingConfig {
                activation_fee: pair("activationFee"),
                install_per_pyeong: pair("installPerPyeong"),
                construction_per_pyeong: pair("constructionPerPyeong"),
                install_cost_per_item: InstallCostPerItem {
                    main: item("main"),
                    recess: item("recess"),
                    line: item("line"),
                },
                switch_gang: pair("switchGang"),
                third_party_gang: pair("thirdPartyGang"),
                updated_at: map.get("updatedAt").and_then(Value::as_i64),
            }
        }
        RawPricing::Legacy(map) => {
            tracing::debug!("reading legacy A/B/C/D pricing record");
            let pair = |key: &str| PricePair::from_legacy(map.get(key));
            PricingConfig {
                activation_fee: pair("activationFee"),
                install_per_pyeong: PricePair::UNSET,
                construction_per_pyeong: PricePair::UNSET,
                install_cost_per_item: InstallCostPerItem::default(),
                switch_gang: pair("switchGang"),
                third_party_gang: pair("thirdPartyGang"),
                updated_at: map.get("updatedAt").and_then(Value::as_i64),
            }
        }
    }
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
