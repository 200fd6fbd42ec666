//! The estimate engine.
//!
//! Pure functions over a catalog, a pricing record and a selection. Every
//! missing price counts as zero and every product that no longer exists is
//! skipped, so the engine is total over its inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::{billable, is_positive};
use crate::pricing::PricingConfig;
use crate::selection::{Activation, SelectionState};
use crate::vendor::BillingClass;

/// Price scale an estimate is computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Dealer,
    Retail,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Dealer, Tier::Retail];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Dealer => "dealer",
            Tier::Retail => "retail",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three subtotals of one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub lighting: Decimal,
    pub install: Decimal,
    pub smart_home: Decimal,
}

impl EstimateResult {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lighting
            .saturating_add(self.install)
            .saturating_add(self.smart_home)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total().is_zero()
    }
}

/// Computes lighting, installation and smart-home totals at `tier`.
#[must_use]
pub fn compute_summary(
    tier: Tier,
    selection: &SelectionState,
    pricing: &PricingConfig,
    catalog: &Catalog,
) -> EstimateResult {
    let mut lighting = Decimal::ZERO;
    let mut install = Decimal::ZERO;

    for (key, qty) in selection.quantities().filter(|(_, q)| *q > 0) {
        let Some(product) = catalog.by_key(key) else {
            continue;
        };
        let qty = Decimal::from(qty);
        let line_total = product.unit_price(tier).saturating_mul(qty);

        match product.category.billing_class() {
            BillingClass::Lighting(surcharge) => {
                lighting = lighting.saturating_add(line_total);
                let per_item = billable(pricing.install_cost_per_item.get(surcharge).get(tier));
                install = install.saturating_add(per_item.saturating_mul(qty));
            }
            BillingClass::FlatItem => {
                install = install.saturating_add(line_total);
            }
        }
    }

    let area = selection.install_area_pyeong();
    let per_gang = billable(pricing.switch_gang.get(tier));
    let third_party = billable(pricing.third_party_gang.get(tier));
    let construction = billable(pricing.construction_per_pyeong.get(tier));

    install = install
        .saturating_add(per_gang.saturating_mul(Decimal::from(selection.total_switch_gangs())))
        .saturating_add(
            third_party.saturating_mul(Decimal::from(selection.third_party_gang_total())),
        )
        .saturating_add(construction.saturating_mul(area));

    let smart_home = if selection.activation == Activation::Yes {
        smart_home_fee(tier, pricing, area)
    } else {
        Decimal::ZERO
    };

    EstimateResult {
        lighting,
        install,
        smart_home,
    }
}

/// Flat activation fee when configured, otherwise the per-area rate × area.
fn smart_home_fee(tier: Tier, pricing: &PricingConfig, area: Decimal) -> Decimal {
    let activation = pricing.activation_fee.get(tier);
    let per_area = pricing.install_per_pyeong.get(tier);
    if is_positive(activation) {
        billable(activation)
    } else if is_positive(per_area) {
        billable(per_area).saturating_mul(area)
    } else {
        Decimal::ZERO
    }
}

/// `JL_{lighting}_{install}_{smartHome}` from dealer totals, rounded to whole won.
#[must_use]
pub fn order_code(dealer: &EstimateResult) -> String {
    format!(
        "JL_{}_{}_{}",
        dealer.lighting.round_dp(0).normalize(),
        dealer.install.round_dp(0).normalize(),
        dealer.smart_home.round_dp(0).normalize()
    )
}

/// Both tiers plus the dealer order code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub retail: EstimateResult,
    pub dealer: EstimateResult,
    pub order_code: String,
}

impl Estimate {
    /// `true` when every subtotal of both tiers is zero; nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retail.is_zero() && self.dealer.is_zero()
    }
}

#[must_use]
pub fn estimate(selection: &SelectionState, pricing: &PricingConfig, catalog: &Catalog) -> Estimate {
    let retail = compute_summary(Tier::Retail, selection, pricing, catalog);
    let dealer = compute_summary(Tier::Dealer, selection, pricing, catalog);
    Estimate {
        order_code: order_code(&dealer),
        retail,
        dealer,
    }
}

#[cfg(test)]
#[path = "estimate_test.rs"]
mod tests;
