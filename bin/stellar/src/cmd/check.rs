//! Check command - validate every document and relationship

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use stellar_content::{ContentBuild, ContentBuilder};
use stellar_core::Config;

/// Run the check command.
///
/// Loads every document, validates it against its schema and resolves
/// relationships across the site. Draft errors are reported but never fail.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking content");

    println!("Checking configuration...");
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    println!("  ✓ Configuration valid");

    println!("\nChecking content in {}...", config.data_dir().display());
    let build = ContentBuilder::new(config)
        .build()
        .wrap_err("Failed to collect content")?;

    print_report(&build);

    let blocking = build.report.diagnostics.blocking().count();
    let failures = build.failures.len();
    if failures > 0 || blocking > 0 {
        bail!(
            "Validation failed: {failures} unreadable file(s), {blocking} invalid document(s)"
        );
    }

    let warnings = build.report.diagnostics.warnings.len();
    if strict && warnings > 0 {
        bail!("Validation failed with {warnings} warning(s) (strict mode)");
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn print_report(build: &ContentBuild) {
    let stats = &build.stats;
    let diagnostics = &build.report.diagnostics;

    println!();
    println!("Summary:");
    println!("  Documents: {}", stats.documents);
    println!("  Valid:     {}", stats.valid);
    println!("  Published: {}", stats.published);
    println!("  Errors:    {}", stats.errors);
    println!("  Warnings:  {}", stats.warnings);
    println!("  Time:      {}ms", stats.duration_ms);

    if !build.failures.is_empty() {
        println!();
        println!("Unreadable files:");
        for failure in &build.failures {
            println!("  ✗ {}: {}", failure.path.display(), failure.error);
        }
    }

    if !diagnostics.errors.is_empty() {
        println!();
        println!("Errors:");
        for document in diagnostics.errors.values() {
            let marker = if document.draft { " (draft, not blocking)" } else { "" };
            println!("  ✗ {} [{}]{marker}", document.id, document.path.display());
            for error in &document.errors {
                println!("      {error}");
            }
        }
    }

    if !diagnostics.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &diagnostics.warnings {
            println!("  ⚠ {warning}");
        }
    }
}
