//! Per-session customer selection.
//!
//! Owned by the caller and handed by reference to the estimate engine. Never
//! written to the shared store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{Catalog, Product};
use crate::guard::BillingModes;
use crate::pricing::PricingConfig;
use crate::vendor::Vendor;
use crate::SelectionError;

/// Upper bound for every quantity and count the customer can enter.
pub const MAX_QUANTITY: u32 = 999;

/// Switch plates come in 1- to 6-gang sizes.
pub const MAX_GANG: u8 = 6;

fn clamp_quantity(n: u32) -> u32 {
    n.min(MAX_QUANTITY)
}

/// Whether smart-home activation is part of the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Yes,
    No,
    #[default]
    Unset,
}

/// `(vendor, productId)`; rendered as `vendor:productId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductKey {
    pub vendor: Vendor,
    pub product_id: String,
}

impl ProductKey {
    #[must_use]
    pub fn new(vendor: Vendor, product_id: impl Into<String>) -> Self {
        Self {
            vendor,
            product_id: product_id.into(),
        }
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.vendor, self.product_id)
    }
}

impl std::str::FromStr for ProductKey {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (vendor, id) = s
            .split_once(':')
            .ok_or_else(|| SelectionError::InvalidProductKey(s.to_string()))?;
        if id.is_empty() {
            return Err(SelectionError::InvalidProductKey(s.to_string()));
        }
        Ok(Self::new(vendor.parse()?, id))
    }
}

impl Serialize for ProductKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProductKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything the customer has chosen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionWire", into = "SelectionWire")]
pub struct SelectionState {
    pub activation: Activation,
    quantities: BTreeMap<ProductKey, u32>,
    switch_counts: [u32; MAX_GANG as usize],
    third_party_gang_total: u32,
    install_area_pyeong: Decimal,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn quantity(&self, key: &ProductKey) -> u32 {
        self.quantities.get(key).copied().unwrap_or(0)
    }

    /// Every recorded quantity, zeros included.
    pub fn quantities(&self) -> impl Iterator<Item = (&ProductKey, u32)> {
        self.quantities.iter().map(|(k, q)| (k, *q))
    }

    /// Sets a product quantity clamped to `0..=999`; returns the stored value.
    /// Zero keeps the entry.
    pub fn set_quantity(&mut self, key: ProductKey, quantity: u32) -> u32 {
        let quantity = clamp_quantity(quantity);
        self.quantities.insert(key, quantity);
        quantity
    }

    pub fn increment(&mut self, key: ProductKey) -> u32 {
        let next = self.quantity(&key).saturating_add(1);
        self.set_quantity(key, next)
    }

    pub fn decrement(&mut self, key: ProductKey) -> u32 {
        let next = self.quantity(&key).saturating_sub(1);
        self.set_quantity(key, next)
    }

    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidGangSize`] unless `gang` is in `1..=6`.
    pub fn switch_count(&self, gang: u8) -> Result<u32, SelectionError> {
        Ok(self.switch_counts[gang_index(gang)?])
    }

    /// Sets how many `gang`-sized switches are ordered, clamped to `0..=999`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidGangSize`] unless `gang` is in `1..=6`.
    pub fn set_switch_count(&mut self, gang: u8, count: u32) -> Result<u32, SelectionError> {
        let slot = &mut self.switch_counts[gang_index(gang)?];
        *slot = clamp_quantity(count);
        Ok(*slot)
    }

    /// Non-zero switch counts as `(gang, count)`, smallest gang first.
    pub fn switch_counts(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=MAX_GANG)
            .zip(self.switch_counts.iter().copied())
            .filter(|(_, count)| *count > 0)
    }

    /// Σ gang size × count over every switch size.
    #[must_use]
    pub fn total_switch_gangs(&self) -> u32 {
        (1..=MAX_GANG)
            .zip(self.switch_counts.iter())
            .fold(0_u32, |acc, (gang, count)| {
                acc.saturating_add(u32::from(gang).saturating_mul(*count))
            })
    }

    #[must_use]
    pub fn third_party_gang_total(&self) -> u32 {
        self.third_party_gang_total
    }

    pub fn set_third_party_gang_total(&mut self, total: u32) -> u32 {
        self.third_party_gang_total = clamp_quantity(total);
        self.third_party_gang_total
    }

    #[must_use]
    pub fn install_area_pyeong(&self) -> Decimal {
        self.install_area_pyeong
    }

    /// Sets the installation area. Only allowed while the pricing record uses
    /// per-area billing.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::AreaLocked`] when per-area billing is off and
    /// [`SelectionError::InvalidArea`] for negative areas.
    pub fn set_install_area(
        &mut self,
        area: Decimal,
        pricing: &PricingConfig,
    ) -> Result<(), SelectionError> {
        if !BillingModes::of(pricing).per_area {
            return Err(SelectionError::AreaLocked);
        }
        if area.is_sign_negative() && !area.is_zero() {
            return Err(SelectionError::InvalidArea);
        }
        self.install_area_pyeong = area;
        Ok(())
    }

    /// Re-applies the area lock after a pricing change: with per-area billing
    /// off the area is reset to zero. Returns whether the area is editable.
    pub fn sync_area_lock(&mut self, pricing: &PricingConfig) -> bool {
        let editable = BillingModes::of(pricing).per_area;
        if !editable && !self.install_area_pyeong.is_zero() {
            tracing::debug!("per-area billing inactive; clearing installation area");
            self.install_area_pyeong = Decimal::ZERO;
        }
        editable
    }

    /// Clears every choice.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Products with a positive quantity that still exist in the catalog,
    /// sorted by vendor, category and name.
    #[must_use]
    pub fn selected_items<'a>(&'a self, catalog: &'a Catalog) -> Vec<SelectedItem<'a>> {
        let mut items: Vec<SelectedItem<'a>> = self
            .quantities
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .filter_map(|(key, qty)| {
                catalog.by_key(key).map(|product| SelectedItem {
                    key,
                    product,
                    quantity: *qty,
                })
            })
            .collect();
        items.sort_by(|a, b| {
            (a.product.vendor.as_str(), a.product.category.label(), &a.product.name).cmp(&(
                b.product.vendor.as_str(),
                b.product.category.label(),
                &b.product.name,
            ))
        });
        items
    }
}

fn gang_index(gang: u8) -> Result<usize, SelectionError> {
    if (1..=MAX_GANG).contains(&gang) {
        Ok(usize::from(gang - 1))
    } else {
        Err(SelectionError::InvalidGangSize(gang))
    }
}

/// A resolved line of the selection.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedItem<'a> {
    pub key: &'a ProductKey,
    pub product: &'a Product,
    pub quantity: u32,
}

/// Serialized selection: switch counts keyed by gang size.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SelectionWire {
    activation: Activation,
    quantities: BTreeMap<ProductKey, u32>,
    switch_counts: BTreeMap<u8, u32>,
    third_party_gang_total: u32,
    install_area_pyeong: Decimal,
}

impl From<SelectionWire> for SelectionState {
    fn from(wire: SelectionWire) -> Self {
        let mut state = SelectionState {
            activation: wire.activation,
            ..SelectionState::default()
        };
        for (key, qty) in wire.quantities {
            state.set_quantity(key, qty);
        }
        for (gang, count) in wire.switch_counts {
            if state.set_switch_count(gang, count).is_err() {
                tracing::warn!(gang, "ignoring switch count for unsupported gang size");
            }
        }
        state.set_third_party_gang_total(wire.third_party_gang_total);
        state.install_area_pyeong = wire.install_area_pyeong.max(Decimal::ZERO);
        state
    }
}

impl From<SelectionState> for SelectionWire {
    fn from(state: SelectionState) -> Self {
        let switch_counts = state.switch_counts().collect();
        SelectionWire {
            activation: state.activation,
            quantities: state.quantities,
            switch_counts,
            third_party_gang_total: state.third_party_gang_total,
            install_area_pyeong: state.install_area_pyeong,
        }
    }
}
