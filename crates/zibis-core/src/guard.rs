//! Mutual exclusion between the two smart-home billing modes.
//!
//! Activation mode bills a flat `activationFee`. Per-area mode bills
//! `installPerPyeong` / `constructionPerPyeong` by installation area. The
//! same classification drives save-time validation and the live input locks
//! of the admin pricing form.

use serde::Serialize;

use crate::money::{parse_price_input, Price};
use crate::pricing::{PricingConfig, PricingField};
use crate::PricingError;

/// Which billing modes a configuration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingModes {
    pub activation: bool,
    pub per_area: bool,
}

impl BillingModes {
    #[must_use]
    pub fn of(config: &PricingConfig) -> Self {
        Self {
            activation: config.activation_fee.any_positive(),
            per_area: config.install_per_pyeong.any_positive()
                || config.construction_per_pyeong.any_positive(),
        }
    }
}

/// Checks a candidate configuration before it is persisted.
///
/// # Errors
///
/// Returns [`PricingError::BothBillingModes`] when activation and per-area
/// pricing are both configured, and [`PricingError::NoBillingMode`] when
/// neither is.
pub fn validate_for_save(config: &PricingConfig) -> Result<(), PricingError> {
    let modes = BillingModes::of(config);
    match (modes.activation, modes.per_area) {
        (true, true) => Err(PricingError::BothBillingModes),
        (false, false) => Err(PricingError::NoBillingMode),
        _ => Ok(()),
    }
}

/// Input locks derived from the current configuration.
///
/// Locking never clears a value: a locked field keeps whatever it held and
/// becomes editable again once the other mode is emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLocks {
    pub activation_locked: bool,
    pub per_area_locked: bool,
}

impl FieldLocks {
    #[must_use]
    pub fn from_config(config: &PricingConfig) -> Self {
        let modes = BillingModes::of(config);
        if modes.activation {
            Self {
                activation_locked: false,
                per_area_locked: true,
            }
        } else if modes.per_area {
            Self {
                activation_locked: true,
                per_area_locked: false,
            }
        } else {
            Self {
                activation_locked: false,
                per_area_locked: false,
            }
        }
    }

    #[must_use]
    pub fn is_locked(&self, field: PricingField) -> bool {
        (field.is_activation() && self.activation_locked)
            || (field.is_per_area() && self.per_area_locked)
    }

    #[must_use]
    pub fn locked_fields(&self) -> Vec<PricingField> {
        PricingField::ALL
            .into_iter()
            .filter(|f| self.is_locked(*f))
            .collect()
    }
}

/// Editing session over a pricing record, re-evaluating locks after every
/// load and every edit.
#[derive(Debug, Clone)]
pub struct PricingForm {
    config: PricingConfig,
    locks: FieldLocks,
}

impl PricingForm {
    #[must_use]
    pub fn load(config: PricingConfig) -> Self {
        let locks = FieldLocks::from_config(&config);
        Self { config, locks }
    }

    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    #[must_use]
    pub fn locks(&self) -> FieldLocks {
        self.locks
    }

    /// Applies raw input text to a field; non-digits are stripped first.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::FieldLocked`] if the field is disabled by the
    /// active billing mode.
    pub fn edit(&mut self, field: PricingField, input: &str) -> Result<Price, PricingError> {
        let price = parse_price_input(input);
        self.set(field, price)?;
        Ok(price)
    }

    /// Applies edits in order. Locks are re-evaluated after each one, so a
    /// batch may clear one mode and then fill in the other.
    ///
    /// # Errors
    ///
    /// Stops at the first locked field; earlier edits stay applied to the
    /// form but nothing is persisted until [`PricingForm::submit`].
    pub fn edit_all<'a, I>(&mut self, edits: I) -> Result<(), PricingError>
    where
        I: IntoIterator<Item = (PricingField, &'a str)>,
    {
        for (field, input) in edits {
            self.edit(field, input)?;
        }
        Ok(())
    }

    /// Sets a field to an already-parsed price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::FieldLocked`] if the field is disabled by the
    /// active billing mode.
    pub fn set(&mut self, field: PricingField, price: Price) -> Result<(), PricingError> {
        if self.locks.is_locked(field) {
            return Err(PricingError::FieldLocked(field));
        }
        self.config.set_field(field, price);
        self.locks = FieldLocks::from_config(&self.config);
        Ok(())
    }

    /// Returns the configuration to persist if it passes the exclusivity check.
    ///
    /// # Errors
    ///
    /// Propagates [`validate_for_save`] rejections.
    pub fn submit(&self) -> Result<PricingConfig, PricingError> {
        validate_for_save(&self.config)?;
        Ok(self.config.clone())
    }
}
