//! Built-in demonstration catalog: one sample product per vendor category.

use crate::catalog::{Catalog, Product, ProductImage};
use crate::pricing::PricePair;
use crate::vendor::{Category, Vendor};

const SEED: [(Vendor, Category, &str, &str); 8] = [
    (Vendor::Hanssem, Category::Recess, "h-recess-01", "리바트 매립등 A"),
    (Vendor::Hanssem, Category::Main, "h-main-01", "리바트 메인등 A"),
    (Vendor::Hanssem, Category::Line, "h-line-01", "리바트 라인등 A"),
    (Vendor::Hanssem, Category::Magnetic, "h-mag-01", "리바트 마그네틱 A"),
    (Vendor::Hanssem, Category::Other, "h-etc-01", "리바트 기타 상품"),
    (Vendor::Zibis, Category::Recess, "z-recess-01", "지비스 매립등 A"),
    (Vendor::Zibis, Category::Line, "z-line-01", "지비스 라인등 A"),
    (Vendor::Zibis, Category::Communication, "z-comm-01", "지비스 통신기기 A"),
];

/// Seed products carry no prices, so they contribute nothing to an estimate.
#[must_use]
pub fn seed_catalog() -> Catalog {
    let products = SEED
        .iter()
        .map(|(vendor, category, id, name)| Product {
            vendor: *vendor,
            id: (*id).to_string(),
            category: *category,
            name: (*name).to_string(),
            prices: PricePair::UNSET,
            image: ProductImage::placeholder_for(name),
            order_code: String::new(),
            updated_at: None,
        })
        .collect();
    Catalog::new(products)
}
