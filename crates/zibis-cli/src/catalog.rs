use clap::Subcommand;
use rust_decimal::Decimal;
use zibis_core::{Catalog, Category, Product, ProductImage, Tier, Vendor};
use zibis_store::ZibisStore;

use crate::pricing::price_cell;

#[derive(Debug, Subcommand)]
pub(crate) enum CatalogCommands {
    /// List catalog items
    List {
        /// Restrict to one vendor (`hanssem` or `zibis`)
        #[arg(long)]
        vendor: Option<Vendor>,
        /// Restrict to one category label, e.g. `매립등`; requires --vendor
        #[arg(long, requires = "vendor")]
        category: Option<String>,
        /// Case-insensitive name search
        #[arg(long, conflicts_with_all = ["vendor", "category"])]
        search: Option<String>,
    },
    /// Add an item and save the catalog
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        vendor: Option<Vendor>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        dealer: Option<Decimal>,
        #[arg(long)]
        retail: Option<Decimal>,
        #[arg(long)]
        order_code: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove an item by id and save the catalog
    Remove { id: String },
    /// Print vendors and their categories
    Vendors,
}

/// Dispatch a catalog subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written, or an argument
/// does not name a known vendor, category or item.
pub(crate) async fn run(store: &ZibisStore, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::List {
            vendor,
            category,
            search,
        } => {
            let catalog = store.load_catalog().await?;
            let category = category.as_deref().map(parse_category).transpose()?;
            run_catalog_list(&catalog, vendor, category, search.as_deref());
            Ok(())
        }
        CatalogCommands::Add {
            name,
            vendor,
            category,
            dealer,
            retail,
            order_code,
            image_url,
        } => {
            let mut catalog = store.load_catalog().await?;
            let category = category.as_deref().map(parse_category).transpose()?;
            let id = add_item(
                &mut catalog,
                NewItem {
                    name,
                    vendor,
                    category,
                    dealer,
                    retail,
                    order_code,
                    image_url,
                },
            );
            store.save_catalog(&catalog).await?;
            println!("added {id}");
            Ok(())
        }
        CatalogCommands::Remove { id } => {
            let mut catalog = store.load_catalog().await?;
            let removed = catalog
                .remove(&id)
                .ok_or_else(|| anyhow::anyhow!("item '{id}' not found"))?;
            store.save_catalog(&catalog).await?;
            println!("removed {} ({})", removed.id, removed.name);
            Ok(())
        }
        CatalogCommands::Vendors => {
            print_vendors();
            Ok(())
        }
    }
}

fn parse_category(raw: &str) -> anyhow::Result<Category> {
    Category::parse(raw.trim()).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        anyhow::anyhow!("unknown category '{raw}'; expected one of {}", known.join(", "))
    })
}

struct NewItem {
    name: String,
    vendor: Option<Vendor>,
    category: Option<Category>,
    dealer: Option<Decimal>,
    retail: Option<Decimal>,
    order_code: Option<String>,
    image_url: Option<String>,
}

/// Applies an add request to `catalog` and returns the new item's id.
/// A category the vendor does not carry falls back to the vendor's default.
fn add_item(catalog: &mut Catalog, item: NewItem) -> String {
    let id = {
        let product = catalog.add_item();
        product.name = item.name.trim().to_string();
        product.prices.dealer = item.dealer.filter(|d| !d.is_sign_negative());
        product.prices.retail = item.retail.filter(|r| !r.is_sign_negative());
        if let Some(code) = item.order_code {
            product.order_code = code.trim().to_string();
        }
        product.id.clone()
    };
    if let Some(vendor) = item.vendor {
        catalog.set_vendor(&id, vendor);
    }
    if let Some(category) = item.category {
        catalog.set_category(&id, category);
    }
    let image = item
        .image_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .map(ProductImage::Url);
    catalog.set_image(&id, image);
    id
}

fn run_catalog_list(
    catalog: &Catalog,
    vendor: Option<Vendor>,
    category: Option<Category>,
    search: Option<&str>,
) {
    let rows: Vec<&Product> = match (search, vendor, category) {
        (Some(query), _, _) => catalog.search(query),
        (None, Some(v), Some(c)) => catalog.products(v, c),
        (None, Some(v), None) => catalog
            .all_products()
            .iter()
            .filter(|p| p.vendor == v)
            .collect(),
        (None, None, _) => catalog.all_products().iter().collect(),
    };

    if rows.is_empty() {
        println!("no catalog items found; run `catalog add` first");
        return;
    }

    println!(
        "{:<38}{:<9}{:<10}{:>14}{:>14}  NAME",
        "ID", "VENDOR", "CATEGORY", "DEALER", "RETAIL"
    );
    for product in rows {
        println!(
            "{:<38}{:<9}{:<10}{:>14}{:>14}  {}",
            product.id,
            product.vendor,
            product.category,
            price_cell(product.prices.get(Tier::Dealer)),
            price_cell(product.prices.get(Tier::Retail)),
            truncate(&product.name, 40)
        );
    }
}

fn print_vendors() {
    for vendor in Vendor::ALL {
        let categories: Vec<&str> = vendor.categories().iter().map(|c| c.label()).collect();
        println!("{:<9}{:<8}{}", vendor.as_str(), vendor.label(), categories.join(", "));
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(name: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            vendor: None,
            category: None,
            dealer: None,
            retail: None,
            order_code: None,
            image_url: None,
        }
    }

    #[test]
    fn add_item_defaults_vendor_and_category() {
        let mut catalog = Catalog::default();
        let id = add_item(&mut catalog, new_item("  새 조명 "));

        let product = catalog.by_id(&id).expect("added item");
        assert_eq!(product.name, "새 조명");
        assert_eq!(product.vendor, Vendor::DEFAULT);
        assert_eq!(product.category, Vendor::DEFAULT.default_category());
        assert_eq!(product.image, ProductImage::placeholder_for("새 조명"));
    }

    #[test]
    fn add_item_applies_prices_and_url() {
        let mut catalog = Catalog::default();
        let mut item = new_item("라인 조명");
        item.vendor = Some(Vendor::Zibis);
        item.dealer = Some(Decimal::from(10_000));
        item.retail = Some(Decimal::from(-5));
        item.image_url = Some("https://cdn.example.com/line.png".to_string());
        let id = add_item(&mut catalog, item);

        let product = catalog.by_id(&id).expect("added item");
        assert_eq!(product.vendor, Vendor::Zibis);
        assert_eq!(product.prices.dealer, Some(Decimal::from(10_000)));
        assert_eq!(product.prices.retail, None);
        assert_eq!(
            product.image,
            ProductImage::Url("https://cdn.example.com/line.png".to_string())
        );
    }

    #[test]
    fn parse_category_accepts_labels() {
        assert_eq!(parse_category("매립등").expect("known label"), Category::Recess);
        assert!(parse_category("recess").is_err());
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("조명조명", 2), "조명...");
        assert_eq!(truncate("조명", 2), "조명");
    }
}
