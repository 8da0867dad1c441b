//! AppImage Settings CLI
//!
//! Inspect and edit the persisted AppImage integration settings.

use appimage_settings::{
    folders, SettingKey, SettingValue, Settings, SettingsError, SettingsStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "appimage-settings")]
#[command(about = "Manage settings for AppImage integration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to settings file (default: ~/.config/appimage-settings/settings.toml)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all settings
    Show,

    /// Print the value of a single key
    Get {
        /// Settings key, e.g. "debug-logs"
        key: String,
    },

    /// Change the value of a single key
    Set {
        /// Settings key, e.g. "debug-logs"
        key: String,

        /// New value ("true"/"false" for toggles, a folder path for the default location)
        value: String,
    },

    /// Restore a key, or every key, to its default value
    Reset {
        /// Settings key; resets everything when omitted
        key: Option<String>,
    },

    /// Show the settings file path
    Path,

    /// List the recognized keys
    Keys,
}

fn main() {
    let cli = Cli::parse();

    // The store is opened before logging so debug-logs can raise the default level
    let store = match open_store(cli.file) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open settings: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = match (cli.verbose, store.settings().debug_logs) {
        (0, false) => "info",
        (0, true) | (1, _) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("appimage_settings={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(cli.command, store) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open_store(file: Option<PathBuf>) -> Result<SettingsStore, SettingsError> {
    match file {
        Some(path) => SettingsStore::open_at(path),
        None => SettingsStore::open(),
    }
}

fn run(command: Commands, mut store: SettingsStore) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Show => {
            let toml = toml::to_string_pretty(store.settings())?;
            print!("{}", toml);
        }

        Commands::Get { key } => {
            let key: SettingKey = key.parse()?;
            println!("{}", store.settings().get(key));
        }

        Commands::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            let value = parse_value(key, &value)?;
            store.set(key, value.clone())?;
            println!("{} = {}", key, value);
        }

        Commands::Reset { key } => match key {
            Some(key) => {
                let key: SettingKey = key.parse()?;
                let value = Settings::default().get(key);
                store.set(key, value.clone())?;
                println!("{} = {}", key, value);
            }
            None => {
                store.replace(Settings::default())?;
                println!("Settings restored to defaults");
            }
        },

        Commands::Path => {
            println!("{}", store.path().display());
        }

        Commands::Keys => {
            for key in SettingKey::ALL {
                println!("{}  ({})", key, key.type_name());
            }
        }
    }

    Ok(())
}

/// Parse a raw value for `key`, validating folder paths the same way the
/// preferences panel does.
fn parse_value(key: SettingKey, raw: &str) -> Result<SettingValue, Box<dyn std::error::Error>> {
    if key == SettingKey::DefaultFolder {
        let home = folders::home_dir().ok_or("No home directory found")?;
        let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
        folders::validate_default_folder(&expanded, &home)?;
        return Ok(SettingValue::Path(folders::collapse_home(&expanded, &home)));
    }

    Ok(SettingValue::parse_for(key, raw)?)
}
