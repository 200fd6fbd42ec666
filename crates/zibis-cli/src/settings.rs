use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Subcommand;
use zibis_core::{parse_settings, BillingModes, ImportedSettings};
use zibis_store::ZibisStore;

#[derive(Debug, Subcommand)]
pub(crate) enum SettingsCommands {
    /// Write pricing and catalog to a backup file
    Export {
        /// Output file; defaults to `zibis-settings-YYYYMMDD-HHMMSS.json`
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Restore pricing and catalog from a backup file
    Import {
        file: PathBuf,
        /// Apply without the dry-run preview
        #[arg(long)]
        yes: bool,
    },
}

/// Export the stored records to a settings file.
///
/// # Errors
///
/// Returns an error if the store read or the file write fails.
pub(crate) async fn run_settings_export(
    store: &ZibisStore,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let snapshot = store.export_settings(now).await?;
    let path = output.map_or_else(|| default_export_name(now), Path::to_path_buf);
    std::fs::write(&path, snapshot.to_json_pretty()?)
        .map_err(|e| anyhow::anyhow!("cannot write {}: {e}", path.display()))?;
    println!("exported settings to {}", path.display());
    Ok(())
}

/// Import a settings file. Without `--yes` only the preview is printed.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported shape,
/// carries invalid pricing, or the store write fails.
pub(crate) async fn run_settings_import(
    store: &ZibisStore,
    file: &Path,
    yes: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", file.display()))?;
    let settings = parse_settings(&text)?;
    println!("{}", describe_import(&settings));

    if !yes {
        println!("dry run; re-run with --yes to overwrite the stored pricing and catalog");
        return Ok(());
    }
    store.import_settings(&settings).await?;
    println!("import complete");
    Ok(())
}

fn default_export_name(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!(
        "zibis-settings-{}.json",
        now.format("%Y%m%d-%H%M%S")
    ))
}

fn describe_import(settings: &ImportedSettings) -> String {
    let modes = BillingModes::of(&settings.pricing);
    let mode = match (modes.activation, modes.per_area) {
        (true, false) => "activation fee",
        (false, true) => "per-area",
        (true, true) => "both (invalid)",
        (false, false) => "none (invalid)",
    };
    format!(
        "pricing billing mode: {mode}\ncatalog items: {}",
        settings.catalog.len()
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use zibis_core::{Catalog, PricingConfig};

    use super::*;

    #[test]
    fn default_export_name_uses_timestamp() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 4, 5, 6, 7)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            default_export_name(now),
            PathBuf::from("zibis-settings-20260304-050607.json")
        );
    }

    #[test]
    fn describe_import_reports_mode_and_count() {
        let settings = ImportedSettings {
            pricing: PricingConfig::builtin_default(),
            catalog: Catalog::default(),
        };
        assert_eq!(
            describe_import(&settings),
            "pricing billing mode: activation fee\ncatalog items: 0"
        );
    }
}
