//! Schema command - export the authoring schema

use color_eyre::eyre::{Result, WrapErr};
use stellar_schema::AuthoringSchema;

/// Run the schema command.
///
/// Prints every collection and singleton schema as JSON, for editors and
/// admin UIs to build their forms from.
pub fn run(compact: bool) -> Result<()> {
    tracing::info!(compact, "Exporting authoring schema");
    println!("{}", render(compact)?);
    Ok(())
}

/// JSON text of the authoring schema.
pub fn render(compact: bool) -> Result<String> {
    let schema = AuthoringSchema::new();
    let json = if compact {
        serde_json::to_string(&schema)
    } else {
        serde_json::to_string_pretty(&schema)
    };
    json.wrap_err("Failed to serialize schema")
}
