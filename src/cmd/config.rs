//! Configuration view and validation commands, `fabclean-admin config`.

use anyhow::Result;

use fabclean_admin::config::{AdminConfig, AdminToml};
use fabclean_admin::credentials::{CredentialStore, SESSION_KEY, TOKEN_KEY};

use super::super::ConfigCommands;

fn print_effective(config: &AdminConfig) -> Result<()> {
    let toml = &config.toml;
    println!("[backend]");
    println!("  base_url = \"{}\"", toml.backend.base_url);
    println!("  timeout_secs = {}", toml.backend.timeout_secs);
    println!();
    println!("[auth]");
    println!("  strategy = \"{}\"", toml.auth.strategy);
    println!(
        "  credentials_file = \"{}\"",
        config.credentials_path().display()
    );
    println!();
    println!("[reconcile]");
    println!("  customers = \"{}\"", toml.reconcile.customers);
    println!("  orders = \"{}\"", toml.reconcile.orders);
    println!("  services = \"{}\"", toml.reconcile.services);
    println!();
    println!("[logging]");
    println!("  level = \"{}\"", toml.logging.level);
    println!("  json = {}", toml.logging.json);
    println!();

    let store = CredentialStore::load(&config.credentials_path())?;
    let stored = |key| if store.get(key).is_some() { "stored" } else { "none" };
    println!("Credentials:");
    println!("  session = {}", stored(SESSION_KEY));
    println!("  token = {}", stored(TOKEN_KEY));
    println!();
    Ok(())
}

pub fn cmd_config(config: &AdminConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_path();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("FabClean Admin Configuration");
            println!("============================");
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No admin.toml found at {}", config_path.display());
                println!("Run 'fabclean-admin config init' to create one.");
            }
            println!();
            println!("Effective values (with env/CLI overrides):");
            println!();
            print_effective(config)?;
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = if config_path.exists() {
                AdminToml::load(&config_path)?.validate()
            } else {
                println!("No admin.toml found. Checking defaults with overrides.");
                config.toml.validate()
            };

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("admin.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            std::fs::create_dir_all(&config.config_dir)?;
            AdminToml::default().save(&config_path)?;

            println!("Created admin.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] base_url, timeout_secs");
            println!("  - [auth] strategy, credentials_file");
            println!("  - [reconcile] customers, orders, services");
            println!();
        }
    }

    Ok(())
}
