//! New command - scaffold a collection entry

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use stellar_content::scaffold_entry;
use stellar_core::Config;
use stellar_schema::CollectionName;

/// Run the new command.
///
/// Creates `<data_dir>/<collection>/<slug>/index.mdx` with every field of
/// the collection's schema stubbed out.
pub fn run(config_path: &Path, collection: CollectionName, name: &str) -> Result<()> {
    tracing::info!(?config_path, %collection, name, "Creating new entry");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let path = scaffold_entry(&config.data_dir(), collection, name)
        .wrap_err_with(|| format!("Failed to create {collection} entry '{name}'"))?;

    println!("Created: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_new_entry_lands_in_data_dir() {
        let dir = TempDir::new().expect("tempdir");
        let config = dir.path().join("stellar.toml");
        fs::write(
            &config,
            "[site]\ntitle = \"Stellar\"\nbase_url = \"https://stellar.example.com\"\n\n[content]\ndata_dir = \"content\"\n",
        )
        .expect("config");

        run(&config, CollectionName::Authors, "Jane Doe").expect("new");
        assert!(dir.path().join("content/authors/jane-doe/index.mdx").is_file());

        // A second run with the same name must not overwrite.
        assert!(run(&config, CollectionName::Authors, "jane doe").is_err());
    }
}
