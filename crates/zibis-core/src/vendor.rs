//! Vendors, product categories and the fixed lookup tables between them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Hanssem,
    Zibis,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Hanssem, Vendor::Zibis];

    /// The vendor assumed for records that do not name a known one.
    pub const DEFAULT: Vendor = Vendor::Hanssem;

    /// Store identifier, e.g. `"hanssem"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Hanssem => "hanssem",
            Vendor::Zibis => "zibis",
        }
    }

    /// Customer-facing brand label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Vendor::Hanssem => "리바트",
            Vendor::Zibis => "지비스",
        }
    }

    /// Categories this vendor may carry, in display order.
    #[must_use]
    pub fn categories(self) -> &'static [Category] {
        match self {
            Vendor::Hanssem => &[
                Category::Recess,
                Category::Main,
                Category::Line,
                Category::Magnetic,
                Category::Other,
            ],
            Vendor::Zibis => &[Category::Recess, Category::Line, Category::Communication],
        }
    }

    /// First allowed category; the repair target for out-of-vocabulary records.
    #[must_use]
    pub fn default_category(self) -> Category {
        self.categories()[0]
    }

    #[must_use]
    pub fn allows(self, category: Category) -> bool {
        self.categories().contains(&category)
    }

    /// Parses a store identifier. Unknown identifiers return `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Vendor> {
        Vendor::ALL.into_iter().find(|v| v.as_str() == raw)
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Vendor {
    type Err = crate::SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vendor::parse(s).ok_or_else(|| crate::SelectionError::UnknownVendor(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "매립등")]
    Recess,
    #[serde(rename = "메인등")]
    Main,
    #[serde(rename = "라인등")]
    Line,
    #[serde(rename = "마그네틱")]
    Magnetic,
    #[serde(rename = "기타")]
    Other,
    #[serde(rename = "통신기기")]
    Communication,
}

/// Key into `installCostPerItem` for lighting categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurchargeKey {
    Main,
    Recess,
    Line,
}

/// Which estimate bucket a category's unit price lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingClass {
    /// Adds to `lighting`, plus a per-item installation surcharge to `install`.
    Lighting(SurchargeKey),
    /// Adds to `install` directly.
    FlatItem,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Recess,
        Category::Main,
        Category::Line,
        Category::Magnetic,
        Category::Other,
        Category::Communication,
    ];

    /// The stored (Korean) label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Recess => "매립등",
            Category::Main => "메인등",
            Category::Line => "라인등",
            Category::Magnetic => "마그네틱",
            Category::Other => "기타",
            Category::Communication => "통신기기",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == raw)
    }

    #[must_use]
    pub fn billing_class(self) -> BillingClass {
        match self {
            Category::Main => BillingClass::Lighting(SurchargeKey::Main),
            Category::Recess => BillingClass::Lighting(SurchargeKey::Recess),
            Category::Line => BillingClass::Lighting(SurchargeKey::Line),
            Category::Magnetic | Category::Other | Category::Communication => {
                BillingClass::FlatItem
            }
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
