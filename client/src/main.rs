use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::app::{build_session_store, resolve_config};
use client::menu::menu_for;
use client::routes::{Navigation, RouteTable, post_login_destination};
use shared::types::{RegistrationData, Role};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adboard", version, about = "Sign in to the ad dashboard and check page access")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Authenticate against the built-in demo accounts instead of the server.
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the credential.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Page to continue to after signing in.
        #[arg(long)]
        from: Option<String>,
    },
    /// Sign out and forget the persisted credential.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    /// Check what a page would show for the current session.
    Visit { path: String },
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// admin, advertiser or viewer.
        #[arg(long, default_value = "viewer")]
        role: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// List the navigation menu for the current session.
    Menu,
    /// List every declared route and who may open it.
    Routes,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli.config)?;

    if let Command::Routes = cli.command {
        print_routes(&RouteTable::dashboard());
        return Ok(());
    }

    let store = build_session_store(&config, cli.offline).await?;
    let session = store.initialize().await;

    match cli.command {
        Command::Login {
            email,
            password,
            from,
        } => match store.login(&email, &password).await {
            Ok(identity) => {
                println!("Signed in as {}", identity);
                println!(
                    "Continue to {}",
                    post_login_destination(&identity, from.as_deref())
                );
            }
            Err(e) => bail!("{} ({})", e.to_message(), e.to_code()),
        },

        Command::Logout => {
            store.logout().await;
            println!("Signed out");
        }

        Command::Whoami => match session.identity() {
            Some(identity) => println!(
                "{} <{}> role={} id={}",
                identity.name(),
                identity.email(),
                identity.role(),
                identity.user_id()
            ),
            None => println!("Not signed in"),
        },

        Command::Visit { path } => match RouteTable::dashboard().navigate(&path, &session) {
            Navigation::Render { path } => println!("render {}", path),
            Navigation::Suspend => println!("loading"),
            Navigation::Redirect { to, from: Some(from) } => {
                println!("redirect {} (from {})", to, from)
            }
            Navigation::Redirect { to, from: None } => println!("redirect {}", to),
            Navigation::NotFound => println!("not found: {}", path),
        },

        Command::Register {
            email,
            password,
            confirm_password,
            first_name,
            last_name,
            role,
            company,
        } => {
            let data = RegistrationData {
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                role: Role::parse(&role),
                company_name: company,
            };
            let profile = store
                .register(&data)
                .await
                .map_err(|e| anyhow::anyhow!("{} ({})", e.to_message(), e.to_code()))
                .context("Registration failed")?;
            println!(
                "Registered {} as {} (id {}). Sign in with `adboard login`.",
                profile.email, profile.role, profile.id
            );
        }

        Command::Menu => {
            for item in menu_for(&session) {
                println!("{:<14} {}", item.label, item.path);
            }
        }

        Command::Routes => {}
    }

    Ok(())
}

fn print_routes(table: &RouteTable) {
    for route in table.routes() {
        let access = match &route.requirement {
            None => "public".to_string(),
            Some(req) if !req.is_role_restricted() => "any signed-in user".to_string(),
            Some(req) => req
                .allowed_roles()
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("{:<24} {:<22} {}", route.path, route.title, access);
    }
}
