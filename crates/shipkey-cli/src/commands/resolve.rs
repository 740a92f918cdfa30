//! `shipkey resolve` command.

use anyhow::{Context, Result};
use clap::Args;

use shipkey_core::models::{DebugSymbolLevel, ToggleOverrides, VariantName};
use shipkey_core::packager::{hand_off, PolicySummary, SummaryPackager};
use shipkey_core::variant::resolve_variant;

use crate::config::ResolvedSettings;

#[derive(Args)]
pub struct ResolveArgs {
    /// Variant to resolve (debug or release)
    pub variant: VariantName,

    /// Override minification (true or false)
    #[arg(long)]
    pub minify: Option<bool>,

    /// Override resource shrinking (true or false)
    #[arg(long)]
    pub shrink_resources: Option<bool>,

    /// Override native debug symbol level (none or full)
    #[arg(long, value_name = "LEVEL")]
    pub debug_symbols: Option<DebugSymbolLevel>,

    /// Print the resolved policy as JSON
    #[arg(long)]
    pub json: bool,
}

impl ResolveArgs {
    fn overrides(&self) -> ToggleOverrides {
        ToggleOverrides {
            minify: self.minify,
            shrink_resources: self.shrink_resources,
            debug_symbol_level: self.debug_symbols,
        }
    }
}

pub fn handle_resolve_command(settings: &ResolvedSettings, args: ResolveArgs) -> Result<()> {
    let summary = resolve_summary(settings, &args)?;

    if args.json {
        println!("{}", summary.to_json_pretty()?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Resolves the requested variant and hands it to the dry-run packager.
pub fn resolve_summary(settings: &ResolvedSettings, args: &ResolveArgs) -> Result<PolicySummary> {
    let table = settings
        .config
        .variant_table()
        .context("Invalid variant table")?;
    let toggles = args.overrides().apply(table.toggles(args.variant));
    let source = settings.key_properties_source();

    let variant = resolve_variant(args.variant, toggles, || source.load())
        .with_context(|| format!("Failed to resolve {} variant", args.variant))?;

    let summary = hand_off(&mut SummaryPackager, variant, &settings.config.pins)
        .context("Packager rejected the resolved policy")?;

    Ok(summary)
}

fn print_summary(summary: &PolicySummary) {
    println!("Variant:            {}", summary.variant);
    println!("Minify:             {}", summary.minify);
    println!("Shrink resources:   {}", summary.shrink_resources);
    println!("Debug symbols:      {}", summary.debug_symbol_level);

    match &summary.signing {
        Some(signing) => {
            println!("Signing:");
            println!("  Keystore:         {}", signing.keystore_path);
            println!("  Key alias:        {}", signing.key_alias);
        }
        None => println!("Signing:            unsigned"),
    }

    let pins = &summary.pins;
    let mut printed_header = false;
    let mut pin = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            if !printed_header {
                println!("Pins:");
                printed_header = true;
            }
            println!("  {:<17} {}", format!("{}:", label), value);
        }
    };
    pin("Namespace", pins.namespace.clone());
    pin("Application ID", pins.application_id.clone());
    pin("Min SDK", pins.min_sdk.map(|v| v.to_string()));
    pin("Compile SDK", pins.compile_sdk.map(|v| v.to_string()));
    pin("Target SDK", pins.target_sdk.map(|v| v.to_string()));
    pin("NDK version", pins.ndk_version.clone());
    pin("Java version", pins.java_version.clone());
    if !pins.proguard_files.is_empty() {
        pin("ProGuard files", Some(pins.proguard_files.join(", ")));
    }
}
