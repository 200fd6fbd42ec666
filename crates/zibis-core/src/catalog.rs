//! Product catalog and the normalizer that reads it from the store.
//!
//! Stored catalogs come either as a direct `id -> record` map or wrapped as
//! `{items: {id -> record}}`. [`RawCatalog::classify`] picks the shape once;
//! every record is then repaired into a [`Product`] whose vendor is known and
//! whose category belongs to that vendor.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::estimate::Tier;
use crate::money::billable;
use crate::placeholder::{placeholder_data_uri, FALLBACK_LABEL};
use crate::pricing::PricePair;
use crate::selection::ProductKey;
use crate::vendor::{Category, Vendor};

/// Where a product's picture comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ProductImage {
    Url(String),
    /// Inline `data:` URI uploaded through the admin panel.
    Embedded(String),
    /// Generated from the product name; never persisted.
    Placeholder(String),
}

impl ProductImage {
    /// Value usable as an `<img src>`.
    #[must_use]
    pub fn src(&self) -> &str {
        match self {
            ProductImage::Url(v) | ProductImage::Embedded(v) | ProductImage::Placeholder(v) => v,
        }
    }

    #[must_use]
    pub fn placeholder_for(name: &str) -> Self {
        let label = if name.is_empty() { FALLBACK_LABEL } else { name };
        ProductImage::Placeholder(placeholder_data_uri(label))
    }

    /// Store shape: `{type, value}`, or `null` for placeholders.
    #[must_use]
    pub fn to_record(&self) -> Value {
        match self {
            ProductImage::Url(v) => json!({ "type": "url", "value": v }),
            ProductImage::Embedded(v) => json!({ "type": "data", "value": v }),
            ProductImage::Placeholder(_) => Value::Null,
        }
    }

    fn from_record(record: &Map<String, Value>) -> Option<Self> {
        if let Some(image) = record.get("image").and_then(Value::as_object) {
            let value = image
                .get("value")
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty());
            if let Some(value) = value {
                return match image.get("type").and_then(Value::as_str) {
                    Some("data" | "embedded") => Some(ProductImage::Embedded(value.to_string())),
                    _ => Some(ProductImage::Url(value.to_string())),
                };
            }
        }
        record
            .get("img")
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(|v| ProductImage::Url(v.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub vendor: Vendor,
    pub id: String,
    pub category: Category,
    pub name: String,
    pub prices: PricePair,
    pub image: ProductImage,
    pub order_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Product {
    #[must_use]
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.vendor, self.id.clone())
    }

    /// Unit price at `tier`; unset counts as zero.
    #[must_use]
    pub fn unit_price(&self, tier: Tier) -> Decimal {
        billable(self.prices.get(tier))
    }

    /// Re-applies the vendor/category rule, repairing the category if needed.
    fn coerce_category(&mut self) {
        if !self.vendor.allows(self.category) {
            tracing::debug!(
                id = %self.id,
                vendor = %self.vendor,
                category = %self.category,
                "category not carried by vendor; using vendor default"
            );
            self.category = self.vendor.default_category();
        }
    }

    fn from_record(id: &str, record: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let raw_vendor = record
            .get("vendor")
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty());
        let (vendor, known_vendor) = match raw_vendor {
            None => (Vendor::DEFAULT, true),
            Some(raw) => match Vendor::parse(raw) {
                Some(vendor) => (vendor, true),
                None => {
                    tracing::debug!(id, vendor = raw, "unknown vendor; using default vendor");
                    (Vendor::DEFAULT, false)
                }
            },
        };

        // Records from unknown vendors land in the default vendor's first category.
        let category = record
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::parse)
            .filter(|_| known_vendor)
            .unwrap_or_else(|| vendor.default_category());

        let name = text("name");
        let image = ProductImage::from_record(record)
            .unwrap_or_else(|| ProductImage::placeholder_for(&name));

        let mut product = Product {
            vendor,
            id: id.to_string(),
            category,
            prices: PricePair::from_current(record.get("prices")),
            image,
            order_code: text("orderCode"),
            updated_at: record.get("updatedAt").and_then(Value::as_i64),
            name,
        };
        product.coerce_category();
        product
    }

    /// Store record shape, without `updatedAt` when it is not known.
    #[must_use]
    pub fn to_record(&self) -> Value {
        let mut record = json!({
            "vendor": self.vendor,
            "category": self.category,
            "name": self.name,
            "prices": self.prices,
            "image": self.image.to_record(),
            "orderCode": self.order_code,
        });
        if let (Some(ts), Some(map)) = (self.updated_at, record.as_object_mut()) {
            map.insert("updatedAt".to_string(), Value::from(ts));
        }
        record
    }
}

/// The shapes a stored catalog value may take.
#[derive(Debug)]
pub enum RawCatalog<'a> {
    Absent,
    /// `{items: {id -> record}}`
    Wrapped(&'a Map<String, Value>),
    /// `{id -> record}`
    Direct(&'a Map<String, Value>),
    Malformed,
}

impl<'a> RawCatalog<'a> {
    #[must_use]
    pub fn classify(raw: Option<&'a Value>) -> Self {
        match raw {
            None | Some(Value::Null) => RawCatalog::Absent,
            Some(Value::Object(map)) => match map.get("items") {
                Some(Value::Object(items)) => RawCatalog::Wrapped(items),
                _ => RawCatalog::Direct(map),
            },
            Some(_) => RawCatalog::Malformed,
        }
    }
}

/// Canonical catalog, queryable by vendor and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Products of one vendor and category, in catalog order.
    #[must_use]
    pub fn products(&self, vendor: Vendor, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.vendor == vendor && p.category == category)
            .collect()
    }

    #[must_use]
    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn by_key(&self, key: &ProductKey) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.vendor == key.vendor && p.id == key.product_id)
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Case-insensitive match on name or order code across every vendor.
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.order_code.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The customer-facing catalog: this one, or the built-in seed when empty.
    #[must_use]
    pub fn or_seed(self) -> Self {
        if self.is_empty() {
            tracing::info!("catalog is empty; serving built-in seed catalog");
            crate::seed::seed_catalog()
        } else {
            self
        }
    }

    /// Appends a blank product with a fresh id under the default vendor.
    pub fn add_item(&mut self) -> &mut Product {
        let vendor = Vendor::DEFAULT;
        let product = Product {
            vendor,
            id: uuid::Uuid::new_v4().to_string(),
            category: vendor.default_category(),
            name: String::new(),
            prices: PricePair::UNSET,
            image: ProductImage::placeholder_for(""),
            order_code: String::new(),
            updated_at: None,
        };
        let idx = self.products.len();
        self.products.push(product);
        &mut self.products[idx]
    }

    pub fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Moves a product to another vendor, re-coercing its category.
    /// Returns `false` if no product has that id.
    pub fn set_vendor(&mut self, id: &str, vendor: Vendor) -> bool {
        let Some(product) = self.product_mut(id) else {
            return false;
        };
        product.vendor = vendor;
        product.coerce_category();
        true
    }

    /// Changes a product's category; categories the vendor does not carry are
    /// replaced by its default. Returns `false` if no product has that id.
    pub fn set_category(&mut self, id: &str, category: Category) -> bool {
        let Some(product) = self.product_mut(id) else {
            return false;
        };
        product.category = category;
        product.coerce_category();
        true
    }

    /// Sets the image; `None` reverts to the generated placeholder.
    pub fn set_image(&mut self, id: &str, image: Option<ProductImage>) -> bool {
        let Some(product) = self.product_mut(id) else {
            return false;
        };
        product.image = image.unwrap_or_else(|| ProductImage::placeholder_for(&product.name));
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let idx = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(idx))
    }

    /// The `id -> record` map written to the store's `items` path.
    #[must_use]
    pub fn to_store_items(&self) -> Map<String, Value> {
        self.products
            .iter()
            .map(|p| (p.id.clone(), p.to_record()))
            .collect()
    }
}

/// Converts a raw stored catalog value into a [`Catalog`]. Never fails: a
/// malformed root yields an empty catalog and non-object records are skipped.
#[must_use]
pub fn normalize_catalog(raw: Option<&Value>) -> Catalog {
    let items = match RawCatalog::classify(raw) {
        RawCatalog::Absent => return Catalog::default(),
        RawCatalog::Malformed => {
            tracing::warn!("catalog root is not an object; using empty catalog");
            return Catalog::default();
        }
        RawCatalog::Wrapped(items) | RawCatalog::Direct(items) => items,
    };

    let products = items
        .iter()
        .filter_map(|(id, record)| match record.as_object() {
            Some(record) => Some(Product::from_record(id, record)),
            None => {
                tracing::warn!(id, "skipping catalog record that is not an object");
                None
            }
        })
        .collect();
    Catalog::new(products)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
