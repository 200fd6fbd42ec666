use serde_json::json;

use super::*;
use crate::catalog::normalize_catalog;
use crate::pricing::PricePair;
use crate::selection::ProductKey;
use crate::vendor::Vendor;

fn catalog() -> Catalog {
    normalize_catalog(Some(&json!({
        "recess": {
            "vendor": "hanssem", "category": "매립등", "name": "Recess",
            "prices": { "dealer": 40000, "retail": 50000 }
        },
        "main": {
            "vendor": "hanssem", "category": "메인등", "name": "Main",
            "prices": { "dealer": 80000, "retail": 100000 }
        },
        "mag": {
            "vendor": "hanssem", "category": "마그네틱", "name": "Magnetic",
            "prices": { "dealer": 30000, "retail": 35000 }
        },
        "hub": {
            "vendor": "zibis", "category": "통신기기", "name": "Hub",
            "prices": { "dealer": "", "retail": 9000 }
        }
    })))
}

fn key(vendor: Vendor, id: &str) -> ProductKey {
    ProductKey::new(vendor, id)
}

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn per_area_pricing() -> PricingConfig {
    PricingConfig {
        activation_fee: PricePair::UNSET,
        install_per_pyeong: PricePair::new(0, 10_000),
        ..PricingConfig::default()
    }
}

#[test]
fn empty_selection_is_zero_for_both_tiers() {
    let selection = SelectionState::new();
    for pricing in [PricingConfig::builtin_default(), per_area_pricing()] {
        for tier in Tier::ALL {
            assert_eq!(
                compute_summary(tier, &selection, &pricing, &catalog()),
                EstimateResult::default()
            );
        }
    }
}

#[test]
fn zeroed_entries_contribute_nothing() {
    let mut selection = SelectionState::new();
    selection.set_quantity(key(Vendor::Hanssem, "recess"), 0);
    selection.set_switch_count(3, 0).expect("valid gang");
    let result = estimate(&selection, &PricingConfig::builtin_default(), &catalog());
    assert!(result.is_empty());
    assert_eq!(result.order_code, "JL_0_0_0");
}

#[test]
fn activation_fee_is_flat_when_activation_is_yes() {
    let mut selection = SelectionState::new();
    selection.activation = Activation::Yes;
    let pricing = PricingConfig::builtin_default();

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.smart_home, dec(244_600));
    assert_eq!(retail.lighting, Decimal::ZERO);
    assert_eq!(retail.install, Decimal::ZERO);

    let dealer = compute_summary(Tier::Dealer, &selection, &pricing, &catalog());
    assert_eq!(dealer.smart_home, dec(200_000));
}

#[test]
fn activation_fee_ignores_installation_area() {
    let mut selection = SelectionState::new();
    selection.activation = Activation::Yes;
    let mut pricing = per_area_pricing();
    selection
        .set_install_area(dec(33), &pricing)
        .expect("per-area mode");
    pricing.activation_fee = PricePair::new(200_000, 244_600);

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.smart_home, dec(244_600));
}

#[test]
fn per_area_rate_multiplies_installation_area() {
    let pricing = per_area_pricing();
    let mut selection = SelectionState::new();
    selection.activation = Activation::Yes;
    selection
        .set_install_area(dec(20), &pricing)
        .expect("per-area mode");

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.smart_home, dec(200_000));

    let dealer = compute_summary(Tier::Dealer, &selection, &pricing, &catalog());
    assert_eq!(dealer.smart_home, Decimal::ZERO);
}

#[test]
fn smart_home_requires_activation_yes() {
    let mut selection = SelectionState::new();
    let pricing = PricingConfig::builtin_default();
    for activation in [Activation::No, Activation::Unset] {
        selection.activation = activation;
        let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
        assert_eq!(retail.smart_home, Decimal::ZERO);
    }
}

#[test]
fn lighting_items_add_unit_price_and_per_item_surcharge() {
    let mut pricing = PricingConfig::default();
    pricing.install_cost_per_item.recess = PricePair::new(4000, 5000);
    let mut selection = SelectionState::new();
    selection.set_quantity(key(Vendor::Hanssem, "recess"), 2);

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.lighting, dec(100_000));
    assert_eq!(retail.install, dec(10_000));

    let dealer = compute_summary(Tier::Dealer, &selection, &pricing, &catalog());
    assert_eq!(dealer.lighting, dec(80_000));
    assert_eq!(dealer.install, dec(8_000));
}

#[test]
fn flat_items_add_to_install_without_surcharge() {
    let mut pricing = PricingConfig::default();
    pricing.install_cost_per_item = crate::pricing::InstallCostPerItem {
        main: PricePair::new(1, 1),
        recess: PricePair::new(1, 1),
        line: PricePair::new(1, 1),
    };
    let mut selection = SelectionState::new();
    selection.set_quantity(key(Vendor::Hanssem, "mag"), 2);
    selection.set_quantity(key(Vendor::Zibis, "hub"), 1);

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.lighting, Decimal::ZERO);
    assert_eq!(retail.install, dec(79_000));

    let dealer = compute_summary(Tier::Dealer, &selection, &pricing, &catalog());
    assert_eq!(dealer.install, dec(60_000));
}

#[test]
fn switch_gangs_are_weighted_by_size() {
    let pricing = PricingConfig::builtin_default();
    let mut selection = SelectionState::new();
    selection.set_switch_count(2, 3).expect("valid gang");

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.install, dec(333_600));
}

#[test]
fn third_party_total_is_already_in_gangs() {
    let pricing = PricingConfig::builtin_default();
    let mut selection = SelectionState::new();
    selection.set_third_party_gang_total(4);

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.install, dec(80_000));
}

#[test]
fn construction_rate_adds_to_install() {
    let mut pricing = per_area_pricing();
    pricing.construction_per_pyeong = PricePair::new(3000, 4000);
    let mut selection = SelectionState::new();
    selection
        .set_install_area(Decimal::new(125, 1), &pricing)
        .expect("per-area mode");

    let retail = compute_summary(Tier::Retail, &selection, &pricing, &catalog());
    assert_eq!(retail.install, dec(50_000));
    assert_eq!(retail.smart_home, Decimal::ZERO);
}

#[test]
fn stale_product_references_are_skipped() {
    let mut selection = SelectionState::new();
    selection.set_quantity(key(Vendor::Hanssem, "deleted"), 5);
    selection.set_quantity(key(Vendor::Zibis, "recess"), 5);
    let retail = compute_summary(
        Tier::Retail,
        &selection,
        &PricingConfig::builtin_default(),
        &catalog(),
    );
    assert_eq!(retail, EstimateResult::default());
}

#[test]
fn unset_prices_count_as_zero() {
    let mut selection = SelectionState::new();
    selection.set_quantity(key(Vendor::Zibis, "hub"), 3);
    selection.set_switch_count(1, 1).expect("valid gang");
    let dealer = compute_summary(
        Tier::Dealer,
        &selection,
        &PricingConfig::default(),
        &catalog(),
    );
    assert_eq!(dealer, EstimateResult::default());
}

#[test]
fn totals_are_monotonic_in_every_count() {
    let mut pricing = PricingConfig::builtin_default();
    pricing.install_cost_per_item.main = PricePair::new(9000, 12_000);
    let catalog = catalog();

    let mut selection = SelectionState::new();
    selection.activation = Activation::Yes;
    let mut previous = compute_summary(Tier::Retail, &selection, &pricing, &catalog);

    let steps: Vec<Box<dyn Fn(&mut SelectionState)>> = vec![
        Box::new(|s| {
            s.increment(key(Vendor::Hanssem, "main"));
        }),
        Box::new(|s| {
            s.increment(key(Vendor::Hanssem, "mag"));
        }),
        Box::new(|s| {
            s.increment(key(Vendor::Zibis, "hub"));
        }),
        Box::new(|s| {
            let next = s.switch_count(6).unwrap_or(0) + 1;
            s.set_switch_count(6, next).expect("valid gang");
        }),
        Box::new(|s| {
            let next = s.third_party_gang_total() + 1;
            s.set_third_party_gang_total(next);
        }),
    ];

    for _ in 0..3 {
        for step in &steps {
            step(&mut selection);
            let current = compute_summary(Tier::Retail, &selection, &pricing, &catalog);
            assert!(current.lighting >= previous.lighting);
            assert!(current.install >= previous.install);
            assert!(current.smart_home >= previous.smart_home);
            previous = current;
        }
    }
}

#[test]
fn order_code_embeds_dealer_totals() {
    let mut pricing = PricingConfig::builtin_default();
    pricing.install_cost_per_item.recess = PricePair::new(4000, 5000);
    let mut selection = SelectionState::new();
    selection.activation = Activation::Yes;
    selection.set_quantity(key(Vendor::Hanssem, "recess"), 2);
    selection.set_switch_count(2, 3).expect("valid gang");

    let result = estimate(&selection, &pricing, &catalog());
    assert_eq!(result.dealer.lighting, dec(80_000));
    assert_eq!(result.dealer.install, dec(8_000 + 45_400 * 6));
    assert_eq!(result.order_code, "JL_80000_280400_200000");
    assert!(!result.is_empty());
}

#[test]
fn order_code_rounds_fractional_totals() {
    let result = EstimateResult {
        lighting: Decimal::new(10_004, 1),
        install: Decimal::new(25, 1),
        smart_home: Decimal::ZERO,
    };
    assert_eq!(order_code(&result), "JL_1000_2_0");
}
