//! List command - show what a build would publish

use std::{fmt::Write as _, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use stellar_content::ContentBuilder;
use stellar_core::Config;
use stellar_schema::{CollectionName, ContentIndex, Entry, PageName};

/// Run the list command.
///
/// Prints the published entries of every collection and the block order of
/// every page. Invalid documents are left out; run `check` for details.
pub fn run(config_path: &Path, drafts: bool) -> Result<()> {
    tracing::info!(?config_path, drafts, "Listing content");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let builder = ContentBuilder::new(config);
    let builder = if drafts { builder.with_drafts(true) } else { builder };
    let build = builder.build().wrap_err("Failed to collect content")?;

    if !build.is_ok() {
        tracing::warn!(
            errors = build.stats.errors,
            failures = build.stats.failures,
            "Some documents are invalid and not listed"
        );
    }

    print!("{}", render(&build.published, builder.config())?);
    Ok(())
}

/// Text listing of a content index.
pub fn render(index: &ContentIndex, config: &Config) -> Result<String> {
    let mut out = String::new();

    for collection in CollectionName::ALL {
        let mut entries: Vec<&Entry> = index.entries(collection).collect();
        if collection == CollectionName::Blog {
            // Newest first, as the blog index renders them.
            entries.sort_by(|a, b| pub_date(b).cmp(&pub_date(a)));
        }

        writeln!(out, "{} ({})", collection.schema().label, entries.len())?;
        for entry in entries {
            let slug = entry.id.slug().unwrap_or_default();
            write!(out, "  {slug:<24} {}", display_name(entry))?;
            if let Some(date) = pub_date(entry) {
                write!(out, "  {date}")?;
            }
            if entry.is_draft() {
                write!(out, "  [draft]")?;
            }
            out.push('\n');
        }
        out.push('\n');
    }

    writeln!(out, "Pages")?;
    for page in PageName::ALL {
        let url = config.url_for(page.route());
        match index.page(page) {
            Some(entry) => {
                writeln!(out, "  {:<24} {url}", page.schema().label)?;
                for block in entry.blocks() {
                    writeln!(out, "    {}. {}", block.position + 1, block.block_type.label())?;
                }
            }
            None => {
                writeln!(out, "  {:<24} {url}  [not published]", page.schema().label)?;
            }
        }
    }

    Ok(out)
}

fn display_name(entry: &Entry) -> &str {
    entry
        .id
        .schema()
        .slug_field
        .as_deref()
        .and_then(|field| entry.text(field))
        .unwrap_or_default()
}

fn pub_date(entry: &Entry) -> Option<chrono::NaiveDate> {
    entry.get("pubDate").and_then(|v| v.as_date())
}
