use std::path::Path;

use zibis_core::{
    estimate, format_won, Catalog, EstimateResult, PricingConfig, SelectionState,
    SelectionSummary,
};
use zibis_store::ZibisStore;

/// Compute and print an estimate for the selection stored in `selection_file`.
///
/// An empty catalog is replaced by the built-in seed so the selection still
/// resolves against something.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the store read
/// fails.
pub(crate) async fn run_estimate(
    store: &ZibisStore,
    selection_file: &Path,
    show_dealer: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(selection_file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", selection_file.display()))?;
    let mut selection: SelectionState = serde_json::from_str(&text)?;

    let snapshot = store.load_snapshot().await?;
    let catalog = snapshot.catalog.or_seed();
    print!(
        "{}",
        render_estimate(&mut selection, &snapshot.pricing, &catalog, show_dealer)
    );
    Ok(())
}

/// Renders the summary block, totals and order code. Applies the area lock
/// first so a per-area value never leaks into activation-mode pricing.
pub(crate) fn render_estimate(
    selection: &mut SelectionState,
    pricing: &PricingConfig,
    catalog: &Catalog,
    show_dealer: bool,
) -> String {
    let area_editable = selection.sync_area_lock(pricing);
    tracing::debug!(area_editable, "selection synced with pricing");
    let summary = SelectionSummary::describe(selection, catalog);
    let result = estimate(selection, pricing, catalog);

    let mut lines = vec![summary.to_string(), String::new()];
    if result.is_empty() {
        lines.push("no priced items selected".to_string());
    } else {
        lines.extend(total_lines("소비자가", &result.retail));
        if show_dealer {
            lines.extend(total_lines("대리점가", &result.dealer));
        }
        lines.push(format!("{:<12}{}", "주문코드", result.order_code));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn total_lines(label: &str, totals: &EstimateResult) -> Vec<String> {
    let mut lines = vec![format!("[{label}]")];
    lines.extend(
        [
            ("조명", totals.lighting),
            ("설치", totals.install),
            ("스마트홈", totals.smart_home),
            ("합계", totals.total()),
        ]
        .into_iter()
        .map(|(name, amount)| format!("  {name:<10}{:>16}", format_won(amount))),
    );
    lines
}
