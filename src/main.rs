use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fabclean_admin::config::{AdminConfig, CliOverrides, LoggingConfig};
use fabclean_admin::gateway::AuthKind;

mod cmd;

#[derive(Parser)]
#[command(name = "fabclean-admin")]
#[command(version, about = "Back-office console for the FabClean laundry service")]
pub struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Backend base URL. Overrides admin.toml and FABCLEAN_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Auth strategy: bearer, session or none
    #[arg(long, global = true)]
    pub auth: Option<AuthKind>,

    /// Credential store file
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage customers
    Customers {
        #[command(subcommand)]
        command: CustomersCommands,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Manage the service catalog
    Services {
        #[command(subcommand)]
        command: ServicesCommands,
    },
    /// Sign in and store the credential
    Login {
        #[command(subcommand)]
        command: LoginCommands,
    },
    /// End the admin session and clear stored credentials
    Logout,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Search and sort flags shared by the list commands.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ListArgs {
    /// Free-text filter (ignored where the screen has no search)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Print the displayed rows as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum CustomersCommands {
    /// List customers
    List(ListArgs),
    /// Create a customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Edit a customer
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a customer
    Delete { id: i64 },
}

#[derive(Subcommand, Clone)]
pub enum OrdersCommands {
    /// List orders
    List(ListArgs),
    /// Show one order
    Show { id: String },
    /// Place an order through the intake endpoint
    Add {
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        customer_phone: String,
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        total: f64,
        #[arg(long)]
        pickup_date: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Edit pickup date, total or special instructions
    Edit {
        id: String,
        #[arg(long)]
        pickup_date: Option<String>,
        #[arg(long)]
        total: Option<f64>,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Delete an order
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
pub enum ServicesCommands {
    /// List services
    List(ListArgs),
    /// Add a service to the catalog
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        duration: Option<String>,
    },
    /// Edit a service
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a service
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
pub enum LoginCommands {
    /// Admin login; stores the session cookie
    Admin {
        #[arg(short, long)]
        username: Option<String>,
        /// Read from FABCLEAN_PASSWORD or prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Customer login; stores the bearer token
    Customer {
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default admin.toml file
    Init,
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let default = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let overrides = CliOverrides {
        base_url: cli.base_url.clone(),
        auth: cli.auth,
        credentials_file: cli.credentials.clone(),
    };
    let config = AdminConfig::load(&project_dir, &overrides)?;
    init_tracing(config.logging(), cli.verbose);

    match &cli.command {
        Commands::Customers { command } => cmd::cmd_customers(&config, &cli, command.clone()).await,
        Commands::Orders { command } => cmd::cmd_orders(&config, &cli, command.clone()).await,
        Commands::Services { command } => cmd::cmd_services(&config, &cli, command.clone()).await,
        Commands::Login { command } => cmd::cmd_login(&config, command.clone()).await,
        Commands::Logout => cmd::cmd_logout(&config).await,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone()),
    }
}

#[tokio::main]
async fn main() {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    if let Err(e) = run(Cli::parse()).await {
        if e.downcast_ref::<cmd::Reported>().is_none() {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
