//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use ratedesk_core::config::{self, Config};
use ratedesk_core::listing::{SortField, SortOrder};
use ratedesk_core::{ApiClient, Role, SessionStore, logging};

mod commands;

#[derive(Parser)]
#[command(name = "ratedesk")]
#[command(version)]
#[command(about = "Store rating dashboards in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new user account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored session
    Whoami,

    /// Admin operations (requires an admin session)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Store owner operations
    Owner {
        #[command(subcommand)]
        command: OwnerCommands,
    },
    /// Browse and rate stores
    Stores {
        #[command(subcommand)]
        command: StoresCommands,
    },

    /// Change the password of the signed-in user
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Forge a local session for a role (demo builds only)
    #[cfg(feature = "demo-role-switch")]
    SwitchRole {
        /// user, admin or store_owner
        #[arg(value_name = "ROLE")]
        role: Role,
    },
}

/// Search and sort flags shared by the admin list commands.
#[derive(clap::Args, Debug, Clone, Default)]
struct ListArgs {
    /// Filter text passed to the backend
    #[arg(long, default_value = "")]
    search: String,
    /// name, email, address, role or rating
    #[arg(long, value_name = "FIELD")]
    sort_by: Option<SortField>,
    /// asc or desc
    #[arg(long, value_name = "ORDER")]
    order: Option<SortOrder>,
}

#[derive(clap::Subcommand)]
enum AdminCommands {
    /// Platform totals
    Stats,
    /// List users
    Users {
        #[command(flatten)]
        list: ListArgs,
    },
    /// List stores
    Stores {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a user with any role
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Create a store, optionally with a new owner account
    AddStore {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long, requires = "owner_password")]
        owner_email: Option<String>,
        #[arg(long, requires = "owner_email")]
        owner_password: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum OwnerCommands {
    /// Average rating and the ratings of your store
    Dashboard,
}

#[derive(clap::Subcommand)]
enum StoresCommands {
    /// List stores with your rating
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Rate a store from 1 to 5
    Rate {
        #[arg(value_name = "STORE_ID")]
        store_id: u64,
        #[arg(value_name = "RATING")]
        rating: u8,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Save the API base URL to the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("load config")?;

    // The dashboard owns the terminal, so it logs to a file instead.
    let _log_guard = if cli.command.is_none() {
        logging::init_file(&config.log, &config::paths::log_dir())?
    } else {
        logging::init_stderr(&config.log)?;
        None
    };
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ratedesk starting");

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(dispatch(cli, config))
}

fn client(config: &Config) -> Result<ApiClient> {
    let session = SessionStore::open_default().context("open session")?;
    ApiClient::from_config(config, session)
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    // default to the dashboard
    let Some(command) = cli.command else {
        return ratedesk_tui::run(client(&config)?).await;
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(),
        #[cfg(feature = "demo-role-switch")]
        Commands::SwitchRole { role } => commands::demo::switch_role(role),

        Commands::Login { email, password } => {
            commands::auth::login(&client(&config)?, email, password).await
        }
        Commands::Signup {
            name,
            email,
            address,
            password,
        } => {
            let form = ratedesk_core::forms::SignupForm {
                name,
                email,
                address,
                password,
            };
            commands::auth::signup(&client(&config)?, &form).await
        }
        Commands::Admin { command } => {
            let api = client(&config)?;
            match command {
                AdminCommands::Stats => commands::admin::stats(&api).await,
                AdminCommands::Users { list } => {
                    commands::admin::users(&api, &list.into_query()).await
                }
                AdminCommands::Stores { list } => {
                    commands::admin::stores(&api, &list.into_query()).await
                }
                AdminCommands::AddUser {
                    name,
                    email,
                    password,
                    address,
                    role,
                } => {
                    let form = ratedesk_core::forms::UserForm {
                        name,
                        email,
                        password,
                        address,
                        role,
                    };
                    commands::admin::add_user(&api, &form).await
                }
                AdminCommands::AddStore {
                    name,
                    email,
                    address,
                    owner_email,
                    owner_password,
                } => {
                    let form = ratedesk_core::forms::StoreForm {
                        name,
                        email,
                        address,
                        create_owner: owner_email.is_some(),
                        owner_email: owner_email.unwrap_or_default(),
                        owner_password: owner_password.unwrap_or_default(),
                    };
                    commands::admin::add_store(&api, &form).await
                }
            }
        }
        Commands::Owner { command } => match command {
            OwnerCommands::Dashboard => commands::owner::dashboard(&client(&config)?).await,
        },
        Commands::Stores { command } => {
            let api = client(&config)?;
            match command {
                StoresCommands::List { search } => commands::stores::list(&api, &search).await,
                StoresCommands::Rate { store_id, rating } => {
                    commands::stores::rate(&api, store_id, rating).await
                }
            }
        }
        Commands::Password {
            current,
            new,
            confirm,
        } => {
            let change = ratedesk_core::forms::PasswordChange {
                current_password: current,
                new_password: new,
                confirm_password: confirm,
            };
            commands::password::change(&config, &change).await
        }
    }
}

impl ListArgs {
    fn into_query(self) -> ratedesk_core::listing::ListQuery {
        let mut query = ratedesk_core::listing::ListQuery {
            search: self.search,
            ..Default::default()
        };
        if let Some(field) = self.sort_by {
            query.sort.field = field;
        }
        if let Some(order) = self.order {
            query.sort.order = order;
        }
        query
    }
}
