use serde_json::json;

use super::*;

fn record(vendor: &str, category: &str, name: &str) -> Value {
    json!({
        "vendor": vendor,
        "category": category,
        "name": name,
        "prices": { "dealer": 40000, "retail": 50000 },
        "image": { "type": "url", "value": "https://cdn.example.com/a.png" },
        "orderCode": "RC-01",
        "updatedAt": 1_700_000_000_000_i64
    })
}

#[test]
fn absent_catalog_is_empty() {
    assert!(normalize_catalog(None).is_empty());
    assert!(normalize_catalog(Some(&Value::Null)).is_empty());
}

#[test]
fn non_object_root_is_empty() {
    assert!(normalize_catalog(Some(&json!([1, 2]))).is_empty());
    assert!(normalize_catalog(Some(&json!("catalog"))).is_empty());
}

#[test]
fn direct_and_wrapped_roots_are_equivalent() {
    let items = json!({ "p1": record("hanssem", "매립등", "Lamp") });
    let wrapped = json!({ "items": items.clone() });
    assert_eq!(
        normalize_catalog(Some(&items)),
        normalize_catalog(Some(&wrapped))
    );
}

#[test]
fn reads_a_current_record() {
    let raw = json!({ "p1": record("zibis", "라인등", "Line A") });
    let catalog = normalize_catalog(Some(&raw));
    let product = catalog
        .by_key(&ProductKey::new(Vendor::Zibis, "p1"))
        .expect("product present");
    assert_eq!(product.category, Category::Line);
    assert_eq!(product.name, "Line A");
    assert_eq!(product.prices, PricePair::new(40_000, 50_000));
    assert_eq!(
        product.image,
        ProductImage::Url("https://cdn.example.com/a.png".to_string())
    );
    assert_eq!(product.order_code, "RC-01");
    assert_eq!(product.updated_at, Some(1_700_000_000_000));
}

#[test]
fn unknown_vendor_is_coerced_to_default_vendor_and_first_category() {
    let raw = json!({ "p1": record("acme", "메인등", "Mystery") });
    let catalog = normalize_catalog(Some(&raw));
    let product = catalog.by_id("p1").expect("product present");
    assert_eq!(product.vendor, Vendor::DEFAULT);
    assert_eq!(product.category, Vendor::DEFAULT.default_category());
}

#[test]
fn missing_vendor_defaults_and_keeps_valid_category() {
    let raw = json!({ "p1": { "category": "메인등", "name": "Main" } });
    let product = normalize_catalog(Some(&raw))
        .by_id("p1")
        .cloned()
        .expect("product present");
    assert_eq!(product.vendor, Vendor::Hanssem);
    assert_eq!(product.category, Category::Main);
}

#[test]
fn category_outside_vendor_range_is_repaired() {
    let raw = json!({ "p1": record("zibis", "메인등", "Main?") });
    let catalog = normalize_catalog(Some(&raw));
    assert_eq!(
        catalog.by_id("p1").map(|p| p.category),
        Some(Category::Recess)
    );
}

#[test]
fn legacy_img_field_is_a_url() {
    let raw = json!({ "p1": { "vendor": "hanssem", "category": "기타", "img": "https://x/y.jpg" } });
    let catalog = normalize_catalog(Some(&raw));
    assert_eq!(
        catalog.by_id("p1").map(|p| p.image.clone()),
        Some(ProductImage::Url("https://x/y.jpg".to_string()))
    );
}

#[test]
fn data_images_are_embedded() {
    let raw = json!({ "p1": {
        "vendor": "hanssem",
        "image": { "type": "data", "value": "data:image/png;base64,AAAA" }
    } });
    let product = normalize_catalog(Some(&raw)).by_id("p1").cloned().expect("present");
    assert!(matches!(product.image, ProductImage::Embedded(_)));
    assert_eq!(product.image.to_record()["type"], "data");
}

#[test]
fn missing_image_gets_deterministic_placeholder() {
    let raw = json!({ "p1": { "vendor": "hanssem", "name": "Lamp" } });
    let a = normalize_catalog(Some(&raw));
    let b = normalize_catalog(Some(&raw));
    let image = &a.by_id("p1").expect("present").image;
    assert!(matches!(image, ProductImage::Placeholder(_)));
    assert_eq!(image, &b.by_id("p1").expect("present").image);
    assert_eq!(image.to_record(), Value::Null);
}

#[test]
fn missing_text_fields_default_to_empty() {
    let raw = json!({ "p1": { "vendor": "zibis" } });
    let product = normalize_catalog(Some(&raw)).by_id("p1").cloned().expect("present");
    assert_eq!(product.name, "");
    assert_eq!(product.order_code, "");
    assert_eq!(product.prices, PricePair::UNSET);
}

#[test]
fn non_object_records_are_skipped() {
    let raw = json!({ "p1": "oops", "p2": { "vendor": "zibis", "name": "ok" } });
    let catalog = normalize_catalog(Some(&raw));
    assert_eq!(catalog.len(), 1);
    assert!(catalog.by_id("p2").is_some());
}

#[test]
fn products_filters_by_vendor_and_category() {
    let raw = json!({
        "a": record("hanssem", "매립등", "A"),
        "b": record("hanssem", "메인등", "B"),
        "c": record("zibis", "매립등", "C")
    });
    let catalog = normalize_catalog(Some(&raw));
    let names: Vec<&str> = catalog
        .products(Vendor::Hanssem, Category::Recess)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["A"]);
    assert_eq!(catalog.all_products().len(), 3);
}

#[test]
fn search_matches_name_or_order_code_case_insensitively() {
    let raw = json!({
        "a": record("hanssem", "매립등", "Slim Downlight"),
        "b": { "vendor": "zibis", "category": "라인등", "name": "Bar", "orderCode": "ZL-900" }
    });
    let catalog = normalize_catalog(Some(&raw));
    assert_eq!(catalog.search("DOWN").len(), 1);
    assert_eq!(catalog.search("zl-9").len(), 1);
    assert!(catalog.search("   ").is_empty());
}

#[test]
fn empty_catalog_falls_back_to_seed() {
    let catalog = Catalog::default().or_seed();
    assert_eq!(catalog.len(), 8);
    let kept = normalize_catalog(Some(&json!({ "a": record("zibis", "라인등", "A") }))).or_seed();
    assert_eq!(kept.len(), 1);
}

#[test]
fn store_items_round_trip() {
    let raw = json!({
        "a": record("hanssem", "매립등", "A"),
        "b": { "vendor": "zibis", "category": "통신기기", "name": "Hub",
               "prices": { "dealer": "", "retail": 9000 }, "image": null, "orderCode": "" }
    });
    let first = normalize_catalog(Some(&raw));
    let stored = Value::Object(first.to_store_items());
    assert_eq!(stored, raw);
    assert_eq!(normalize_catalog(Some(&stored)), first);
}

#[test]
fn added_item_uses_default_vendor_and_first_category() {
    let mut catalog = Catalog::default();
    let id = catalog.add_item().id.clone();
    let product = catalog.by_id(&id).expect("added");
    assert_eq!(product.vendor, Vendor::DEFAULT);
    assert_eq!(product.category, Vendor::DEFAULT.default_category());
    assert_eq!(product.prices, PricePair::UNSET);
    assert_ne!(catalog.add_item().id, id);
}

#[test]
fn changing_vendor_recoerces_category() {
    let raw = json!({ "a": record("hanssem", "메인등", "A") });
    let mut catalog = normalize_catalog(Some(&raw));
    assert!(catalog.set_vendor("a", Vendor::Zibis));
    assert_eq!(catalog.by_id("a").map(|p| p.category), Some(Category::Recess));
    assert!(catalog.set_category("a", Category::Communication));
    assert_eq!(
        catalog.by_id("a").map(|p| p.category),
        Some(Category::Communication)
    );
    assert!(catalog.set_category("a", Category::Magnetic));
    assert_eq!(catalog.by_id("a").map(|p| p.category), Some(Category::Recess));
    assert!(!catalog.set_vendor("missing", Vendor::Zibis));
}

#[test]
fn remove_drops_the_item() {
    let raw = json!({ "a": record("hanssem", "매립등", "A") });
    let mut catalog = normalize_catalog(Some(&raw));
    assert_eq!(catalog.remove("a").map(|p| p.name), Some("A".to_string()));
    assert!(catalog.is_empty());
    assert!(catalog.remove("a").is_none());
}
