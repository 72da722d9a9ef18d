//! Subcommand execution

use crate::cli::{Commands, key_convention};
use crate::errors::CliError;
use opfield::{Item, KeyConvention};
use std::io::Write;

pub fn run(command: Commands, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Commands::Item {
            title,
            vault,
            vault_title,
            fields,
            key_suffix,
            json,
            connection,
        } => {
            let mut settings = connection.settings();
            if let Some(vault) = vault {
                settings = settings.with_vault(vault);
            }
            if let Some(vault_title) = vault_title {
                settings = settings.with_vault_title(vault_title);
            }
            let convention = key_convention(key_suffix.as_deref());

            let item = opfield::get_item(&title, settings)
                .map_err(|e| CliError::item_failed(&title, e))?;
            if fields.is_empty() {
                write_labels(&item, json, out)
            } else {
                write_fields(&item, &fields, &convention, json, out)
            }
        }
        Commands::Vault { title, connection } => {
            let settings = connection.settings();
            let id = opfield::resolve_client(&settings)
                .and_then(|client| opfield::resolve_vault_by_title(&*client, &title))
                .map_err(|e| CliError::vault_failed(&title, e))?;
            writeln!(out, "{id}")?;
            Ok(())
        }
    }
}

/// List field labels only; values are never printed without `--field`.
fn write_labels(item: &Item, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let labels = item.labels();
    if json {
        serde_json::to_writer(&mut *out, &labels)?;
        writeln!(out)?;
    } else {
        for label in labels {
            writeln!(out, "{label}")?;
        }
    }
    Ok(())
}

fn write_fields(
    item: &Item,
    fields: &[String],
    convention: &KeyConvention,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let values = fields
        .iter()
        .map(|field| (field.as_str(), item.get_value(&convention.key_for(field))));

    if json {
        let object: serde_json::Map<String, serde_json::Value> = values
            .map(|(field, value)| (field.to_string(), serde_json::Value::String(value)))
            .collect();
        serde_json::to_writer(&mut *out, &object)?;
        writeln!(out)?;
    } else {
        for (field, value) in values {
            writeln!(out, "{field}={value}")?;
        }
    }
    tracing::debug!(fields = fields.len(), "Wrote item fields");
    Ok(())
}
