use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Subcommand;
use zibis_core::{
    format_won, normalize_pricing, validate_for_save, BillingModes, FieldLocks, PricingConfig,
    PricingError, PricingField, PricingForm,
};
use zibis_store::ZibisStore;

#[derive(Debug, Subcommand)]
pub(crate) enum PricingCommands {
    /// Print every pricing field with its lock state
    Show,
    /// Apply `FIELD=VALUE` edits in order and save the record once
    Set {
        /// e.g. `installCostPerItem.recess.retail=12000`; an empty value
        /// clears the field
        #[arg(required = true, value_name = "FIELD=VALUE")]
        edits: Vec<FieldAssignment>,
    },
    /// Validate a local pricing JSON file without saving it
    Check {
        #[arg(long)]
        file: PathBuf,
    },
}

/// One `FIELD=VALUE` argument of `pricing set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldAssignment {
    pub field: PricingField,
    pub value: String,
}

impl FromStr for FieldAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
        let field = field
            .trim()
            .parse::<PricingField>()
            .map_err(|e| e.to_string())?;
        Ok(Self {
            field,
            value: value.to_string(),
        })
    }
}

/// Print the live pricing record.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub(crate) async fn run_pricing_show(store: &ZibisStore) -> anyhow::Result<()> {
    let pricing = store.load_pricing().await?;
    print_pricing(&pricing);
    Ok(())
}

/// Apply the edits through the form guard and save once.
///
/// # Errors
///
/// Returns an error if a field is locked, the result has an invalid
/// billing-mode combination, or the store write fails.
pub(crate) async fn run_pricing_set(
    store: &ZibisStore,
    edits: &[FieldAssignment],
) -> anyhow::Result<()> {
    let pricing = apply_edits(store.load_pricing().await?, edits)?;
    store.save_pricing(&pricing).await?;
    for edit in edits {
        println!("{} = {}", edit.field, price_cell(pricing.field(edit.field)));
    }
    Ok(())
}

fn apply_edits(
    current: PricingConfig,
    edits: &[FieldAssignment],
) -> Result<PricingConfig, PricingError> {
    let mut form = PricingForm::load(current);
    form.edit_all(edits.iter().map(|e| (e.field, e.value.as_str())))?;
    form.submit()
}

/// Validate a pricing file against the billing-mode rules.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or fails
/// validation.
pub(crate) fn run_pricing_check(file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", file.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&text)?;
    let pricing = normalize_pricing(Some(&raw));
    validate_for_save(&pricing)?;
    let modes = BillingModes::of(&pricing);
    println!(
        "ok: {} (activation={}, per-area={})",
        file.display(),
        modes.activation,
        modes.per_area
    );
    Ok(())
}

fn print_pricing(pricing: &PricingConfig) {
    let locks = FieldLocks::from_config(pricing);
    let header = format!("{:<36}{:>16}  STATE", "FIELD", "VALUE");
    println!("{header}");
    for field in PricingField::ALL {
        let state = if locks.is_locked(field) { "locked" } else { "" };
        println!(
            "{:<36}{:>16}  {state}",
            field.path(),
            price_cell(pricing.field(field))
        );
    }
}

pub(crate) fn price_cell(price: zibis_core::Price) -> String {
    price.map_or_else(|| "-".to_string(), format_won)
}
