//! Config show subcommand
//!
//! Displays current configuration in table or JSON format.
//! Nested sections are flattened to dotted keys so the table stays readable.
//! Secrets are masked in both formats.

use anyhow::Result;
use claudeforge_core::{Config, config};
use comfy_table::{Cell, Color, Table};
use serde_json::Value;

/// Fields whose values are masked in output
const SENSITIVE_FIELDS: &[&str] = &[
    "github.token",
    "notifications.discord.bot_token",
    "notifications.email.password",
    "daemon.webhook_secret",
];

/// Show current configuration
///
/// Displays all configuration values in a formatted table. Uses serde
/// serialization so new Config fields show up without code changes here.
pub fn cmd_config_show(config: &Config, json: bool, _quiet: bool) -> Result<()> {
    if json {
        return show_json(config);
    }

    show_table(config)
}

fn show_json(config: &Config) -> Result<()> {
    let mut value = serde_json::to_value(config)?;
    mask_sensitive_fields(&mut value, "");
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn show_table(config: &Config) -> Result<()> {
    let value = serde_json::to_value(config)?;

    let mut rows = Vec::new();
    flatten("", &value, &mut rows);

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for (key, val) in &rows {
        let display_value = format_value(key, val);
        let cell = apply_cell_styling(key, val, display_value);
        table.add_row(vec![Cell::new(key), cell]);
    }

    println!("{table}");

    if let Some(path) = config::paths::get_config_path() {
        println!();
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Flatten nested objects into dotted keys, preserving field order
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                let dotted = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&dotted, val, rows);
            }
        }
        _ => rows.push((prefix.to_string(), value.clone())),
    }
}

/// Format a JSON value for display
fn format_value(key: &str, value: &Value) -> String {
    if SENSITIVE_FIELDS.contains(&key) {
        return format_sensitive(value);
    }

    match value {
        Value::Null => "(not set)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn format_sensitive(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => "********".to_string(),
        _ => "(not set)".to_string(),
    }
}

/// Apply color styling to cells based on security implications
fn apply_cell_styling(key: &str, value: &Value, display_value: String) -> Cell {
    if key == "daemon.bind" {
        let addr = value.as_str().unwrap_or("");
        return if is_localhost(addr) {
            Cell::new(display_value).fg(Color::Green)
        } else {
            // Network-exposed listener
            Cell::new(display_value).fg(Color::Yellow)
        };
    }

    Cell::new(display_value)
}

fn is_localhost(addr: &str) -> bool {
    matches!(addr, "127.0.0.1" | "::1" | "localhost")
}

/// Mask sensitive fields in a JSON Value (for JSON output)
fn mask_sensitive_fields(value: &mut Value, prefix: &str) {
    let Value::Object(obj) = value else {
        return;
    };

    for (key, val) in obj.iter_mut() {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if val.is_object() {
            mask_sensitive_fields(val, &dotted);
            continue;
        }

        if SENSITIVE_FIELDS.contains(&dotted.as_str())
            && let Value::String(s) = val
            && !s.is_empty()
        {
            *val = Value::String("********".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_masks_token() {
        let val = Value::String("ghp_secret".to_string());
        assert_eq!(format_value("github.token", &val), "********");
    }

    #[test]
    fn test_format_value_shows_not_set_for_empty_token() {
        let val = Value::String(String::new());
        assert_eq!(format_value("github.token", &val), "(not set)");
    }

    #[test]
    fn test_format_value_preserves_normal_strings() {
        let val = Value::String("claude-code".to_string());
        assert_eq!(format_value("claude.binary", &val), "claude-code");
    }

    #[test]
    fn test_format_value_shows_not_set_for_null() {
        assert_eq!(format_value("daemon.webhook_secret", &Value::Null), "(not set)");
    }

    #[test]
    fn test_flatten_produces_dotted_keys() {
        let config = Config::default();
        let value = serde_json::to_value(&config).unwrap();
        let mut rows = Vec::new();
        flatten("", &value, &mut rows);

        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"version"));
        assert!(keys.contains(&"github.token"));
        assert!(keys.contains(&"claude.timeout_secs"));
        assert!(keys.contains(&"notifications.email.smtp_port"));
        assert!(keys.contains(&"daemon.trigger_label"));
    }

    #[test]
    fn test_mask_sensitive_fields_nested() {
        let mut value = serde_json::json!({
            "github": { "token": "ghp_secret", "api_url": "https://api.github.com" },
            "daemon": { "webhook_secret": "s3cret" }
        });
        mask_sensitive_fields(&mut value, "");

        assert_eq!(value["github"]["token"], "********");
        assert_eq!(value["github"]["api_url"], "https://api.github.com");
        assert_eq!(value["daemon"]["webhook_secret"], "********");
    }

    #[test]
    fn test_is_localhost() {
        assert!(is_localhost("127.0.0.1"));
        assert!(is_localhost("::1"));
        assert!(!is_localhost("0.0.0.0"));
    }
}
