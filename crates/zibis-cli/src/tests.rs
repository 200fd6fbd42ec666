use super::*;
use zibis_core::{PricingField, Vendor};

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["zibis-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_pricing_show_command() {
    let cli = Cli::try_parse_from(["zibis-cli", "pricing", "show"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Pricing {
            command: PricingCommands::Show
        })
    ));
}

#[test]
fn parses_pricing_set_with_dotted_field() {
    let cli = Cli::try_parse_from([
        "zibis-cli",
        "pricing",
        "set",
        "installCostPerItem.recess.retail=12000",
        "activationFee.dealer=",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Pricing {
            command: PricingCommands::Set { edits },
        }) => {
            assert_eq!(edits.len(), 2);
            assert_eq!(edits[0].field, PricingField::RecessInstallRetail);
            assert_eq!(edits[0].value, "12000");
            assert_eq!(edits[1].field, PricingField::ActivationDealer);
            assert_eq!(edits[1].value, "");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn pricing_set_rejects_unknown_field() {
    let result = Cli::try_parse_from(["zibis-cli", "pricing", "set", "activationFee.wholesale=1"]);
    assert!(result.is_err());
}

#[test]
fn pricing_set_requires_an_edit() {
    let result = Cli::try_parse_from(["zibis-cli", "pricing", "set"]);
    assert!(result.is_err());
}

#[test]
fn parses_pricing_check_file() {
    let cli = Cli::try_parse_from(["zibis-cli", "pricing", "check", "--file", "pricing.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Pricing {
            command: PricingCommands::Check { .. }
        })
    ));
}

#[test]
fn parses_catalog_list_with_vendor() {
    let cli = Cli::try_parse_from(["zibis-cli", "catalog", "list", "--vendor", "zibis"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::List {
                vendor: Some(Vendor::Zibis),
                category: None,
                search: None
            }
        })
    ));
}

#[test]
fn catalog_list_category_requires_vendor() {
    let result = Cli::try_parse_from(["zibis-cli", "catalog", "list", "--category", "매립등"]);
    assert!(result.is_err());
}

#[test]
fn catalog_list_search_conflicts_with_vendor() {
    let result = Cli::try_parse_from([
        "zibis-cli", "catalog", "list", "--search", "조명", "--vendor", "hanssem",
    ]);
    assert!(result.is_err());
}

#[test]
fn catalog_add_rejects_unknown_vendor() {
    let result = Cli::try_parse_from([
        "zibis-cli", "catalog", "add", "--name", "x", "--vendor", "acme",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_estimate_with_dealer_flag() {
    let cli = Cli::try_parse_from([
        "zibis-cli",
        "estimate",
        "--selection",
        "selection.json",
        "--dealer",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Estimate { selection, dealer }) => {
            assert_eq!(selection, PathBuf::from("selection.json"));
            assert!(dealer);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn settings_import_defaults_to_dry_run() {
    let cli = Cli::try_parse_from(["zibis-cli", "settings", "import", "backup.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::Import { yes: false, .. }
        })
    ));
}

#[test]
fn parses_settings_export_without_output() {
    let cli = Cli::try_parse_from(["zibis-cli", "settings", "export"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::Export { output: None }
        })
    ));
}
