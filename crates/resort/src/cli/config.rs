//! Config command handlers

use std::path::PathBuf;

use resort_core::config::Config;
use resort_core::policy::AttachmentLocation;

use crate::cli::args::ConfigCommands;
use crate::cli::util::effective_config;

pub fn handle_config_command(command: Option<ConfigCommands>, vault_override: Option<PathBuf>) -> bool {
    match command {
        None | Some(ConfigCommands::Show) => show_config(vault_override),
        Some(ConfigCommands::Init) => init_config(vault_override),
    }
}

/// Show the effective resort configuration
fn show_config(vault_override: Option<PathBuf>) -> bool {
    let config = match effective_config(vault_override) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    println!("Resort Configuration");
    println!("====================");
    match Config::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created yet)", path.display()),
        None => println!("Config file: (no config directory)"),
    }
    println!("Vault: {}", config.vault.display());
    if !config.vault.is_dir() {
        println!("  ⚠ vault folder does not exist");
    }

    let policy = &config.attachments;
    let location = match policy.location {
        AttachmentLocation::SameFolder => "next to each note",
        AttachmentLocation::VaultFolder => "under one vault folder",
        AttachmentLocation::NoteFolder => "in the note's own folder",
    };
    println!("Attachment folders: {}", location);
    match policy.location {
        AttachmentLocation::SameFolder => println!("  Folder name: {}", policy.folder_name),
        AttachmentLocation::VaultFolder => {
            println!("  Vault folder: {}", policy.vault_folder);
            println!("  Folder name: {}", policy.folder_name);
        }
        AttachmentLocation::NoteFolder => {}
    }
    true
}

/// Write a default config for the chosen vault
fn init_config(vault_override: Option<PathBuf>) -> bool {
    let vault = match vault_override {
        Some(vault) => vault,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("✗ Could not determine current directory: {}", e);
                return false;
            }
        },
    };

    if let Some(path) = Config::config_path()
        && path.exists()
    {
        eprintln!("✗ Config already exists at {}", path.display());
        return false;
    }

    match Config::init(vault) {
        Ok(config) => {
            println!("✓ Initialized config for vault {}", config.vault.display());
            if let Some(path) = Config::config_path() {
                println!("  Edit {} to change the attachment folder policy.", path.display());
            }
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}
