//! Config file commands for CLI.

use clap::Subcommand;
use pomotodo_core::{format_clock, Config, ConfigError, Result};
use serde_json::Value;

use super::print_json;

/// Sections in the order they appear in `config.toml`.
const SECTIONS: [&str; 3] = ["session", "notifications", "logging"];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, or a whole section (e.g. "session", "session.work_duration")
    Get { key: String },
    /// Set a value and save the config file
    Set { key: String, value: String },
    /// Print every section with durations in seconds and mm:ss
    List {
        /// Print the config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the config file with defaults
    Reset,
}

/// `key = value`, with a clock reading appended to durations.
fn line(key: &str, value: &Value) -> String {
    match value.as_u64() {
        Some(secs) if key.ends_with("_duration") => {
            format!("{key} = {secs}  # seconds ({})", format_clock(secs as f64))
        }
        _ => format!("{key} = {value}"),
    }
}

fn print_section(config: &Config, section: &str) {
    let Some(Value::Object(table)) = config.value_at(section) else {
        return;
    };
    println!("[{section}]");
    for (key, value) in &table {
        println!("{}", line(key, value));
    }
}

fn print_all(config: &Config) {
    for section in SECTIONS {
        print_section(config, section);
    }
}

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Get { key } => match config.value_at(&key) {
            Some(Value::Object(_)) => print_section(config, &key),
            Some(Value::String(s)) => println!("{s}"),
            Some(value) => println!("{value}"),
            None => return Err(ConfigError::UnknownKey(key).into()),
        },
        ConfigAction::Set { key, value } => {
            let mut config = config.clone();
            config.set(&key, &value)?;
            config.save()?;
            if let Some(stored) = config.value_at(&key) {
                let name = key.rsplit('.').next().unwrap_or(&key);
                println!("{}", line(name, &stored));
            }
        }
        ConfigAction::List { json } => {
            if json {
                print_json(config)?;
            } else {
                print_all(config);
            }
        }
        ConfigAction::Reset => {
            let defaults = Config::default();
            defaults.save()?;
            print_all(&defaults);
        }
    }
    Ok(())
}
