//! Get command implementation for reading settings and configuration fields
//!
//! Values are printed either human-readable or as a single JSON object, so
//! scripts can query the schedule without parsing the TOML file.

use anyhow::{Context, Result};
use serde_json::json;

use super::{Field, all_field_names, field_value};
use crate::config::Config;
use crate::constants::EXIT_FAILURE;
use crate::logger::Log;
use crate::settings::{FileSettingsStore, SettingsStore};

/// Handle the get command - read fields
///
/// # Arguments
/// * `fields` - Field names to retrieve, or the single special value `all`
/// * `json` - Whether to output in JSON format
pub fn handle_get_command(fields: &[String], json: bool) -> Result<()> {
    // JSON consumers get nothing but the JSON object
    if json {
        Log::set_enabled(false);
    }

    super::find_daemon()?;
    let config = Config::load().context("Failed to load configuration")?;
    let store = FileSettingsStore::from_config_path()?;

    let names: Vec<String> = if is_all(fields) {
        all_field_names().into_iter().map(str::to_string).collect()
    } else {
        fields.to_vec()
    };

    let unknown: Vec<&str> = names
        .iter()
        .filter(|name| Field::parse(name).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        report_unknown(&unknown, json)?;
        std::process::exit(EXIT_FAILURE);
    }

    let values = collect_values(&names, &config, &store)?;

    if json {
        let object: serde_json::Map<String, serde_json::Value> = values.into_iter().collect();
        println!("{}", serde_json::to_string(&object)?);
    } else if values.len() == 1 && !is_all(fields) {
        // Single field - just output the value
        println!("{}", plain(&values[0].1));
    } else {
        for (name, value) in &values {
            println!("{name}={}", plain(value));
        }
    }

    Ok(())
}

fn is_all(fields: &[String]) -> bool {
    fields.len() == 1 && fields[0] == "all"
}

fn report_unknown(unknown: &[&str], json: bool) -> Result<()> {
    let message = if unknown.len() == 1 {
        format!("Unknown field: {}", unknown[0])
    } else {
        format!("Unknown fields: {}", unknown.join(", "))
    };

    if json {
        let error = json!({
            "error": message,
            "type": "UnknownField",
            "available": all_field_names(),
        });
        eprintln!("{}", serde_json::to_string(&error)?);
    } else {
        log_pipe!();
        log_error!("{message}");
        super::log_available_fields();
        log_end!();
    }
    Ok(())
}

/// Values for `names`, in order. Every name must be a known field.
fn collect_values(
    names: &[String],
    config: &Config,
    store: &dyn SettingsStore,
) -> Result<Vec<(String, serde_json::Value)>> {
    names
        .iter()
        .map(|name| {
            let field = Field::parse(name).with_context(|| format!("Unknown field: {name}"))?;
            Ok((name.clone(), field_value(field, config, store)?))
        })
        .collect()
}

/// Human-readable form of a value: strings unquoted, lists comma-separated,
/// absent values empty.
fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Display help for the get command
pub fn display_help() {
    log_version!();
    log_block_start!("get - Read setting and configuration values");
    log_block_start!("Usage: themeshift get [OPTIONS] <field> [<field>...]");
    log_indented!("themeshift get all");
    log_block_start!("Options:");
    log_indented!("--json                 Print a single JSON object");
    super::log_available_fields();
    log_block_start!("Examples:");
    log_indented!("themeshift get light_profile");
    log_indented!("themeshift get start_hour end_hour");
    log_indented!("themeshift get --json all");
    log_end!();
}
