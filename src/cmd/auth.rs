//! Sign-in and sign-out, `fabclean-admin login` / `fabclean-admin logout`.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password};

use fabclean_admin::config::AdminConfig;
use fabclean_admin::credentials::{CredentialStore, SESSION_KEY, TOKEN_KEY};
use fabclean_admin::gateway::{AuthClient, AuthKind, session::admin_logout};
use fabclean_admin::ui::icons::{CHECK, KEY, WARN};

use super::super::LoginCommands;
use super::connect;

fn prompt_text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn prompt_password(value: Option<String>) -> Result<String> {
    if let Some(v) = value.or_else(|| std::env::var("FABCLEAN_PASSWORD").ok()) {
        return Ok(v);
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")
}

pub async fn cmd_login(config: &AdminConfig, command: LoginCommands) -> Result<()> {
    let client = AuthClient::new(config.base_url(), config.timeout())?;
    let path = config.credentials_path();
    let mut store = CredentialStore::load(&path)?;

    let expected = match command {
        LoginCommands::Admin { username, password } => {
            let username = prompt_text(username, "Username")?;
            let password = prompt_password(password)?;
            let cookie = client.admin_login(&username, &password).await?;
            store.set(SESSION_KEY, cookie);
            println!("{}{}Signed in as admin {}", CHECK, KEY, style(&username).bold());
            AuthKind::Session
        }
        LoginCommands::Customer { email, password } => {
            let email = prompt_text(email, "Email")?;
            let password = prompt_password(password)?;
            let login = client.customer_login(&email, &password).await?;
            store.set(TOKEN_KEY, login.token);
            println!(
                "{}{}Signed in as {} <{}>",
                CHECK,
                KEY,
                style(&login.customer.name).bold(),
                login.customer.email
            );
            AuthKind::Bearer
        }
    };

    store.save()?;
    tracing::info!(path = %path.display(), "credential stored");

    if config.auth_kind() != expected {
        println!(
            "{}auth.strategy is '{}'; pass --auth {} (or set it in admin.toml) to use this credential.",
            WARN,
            config.auth_kind(),
            expected
        );
    }
    Ok(())
}

pub async fn cmd_logout(config: &AdminConfig) -> Result<()> {
    let path = config.credentials_path();
    let mut store = CredentialStore::load(&path)?;

    if store.get(SESSION_KEY).is_some() && config.auth_kind() == AuthKind::Session {
        let gateway = connect(config)?;
        if let Err(e) = admin_logout(gateway.as_ref()).await {
            // The local credential is cleared regardless.
            tracing::warn!(error = %e, "backend logout failed");
        }
    }

    let had_any = store.remove(SESSION_KEY).is_some() | store.remove(TOKEN_KEY).is_some();
    store.save()?;

    if had_any {
        println!("{}Signed out; stored credentials cleared.", CHECK);
    } else {
        println!("No stored credentials.");
    }
    Ok(())
}
