//! `cartflow` command line: drive the session coordinator against a live
//! storefront server.
//!
//! Time is virtual. Redirects and notice dismissals are fast-forwarded after
//! each command and the resulting navigation is printed instead of performed.

use std::rc::Rc;

use cartflow::app::{FormOutcome, LogoutOutcome, Storefront};
use cartflow::config::{ClientConfig, ConfigError};
use cartflow::net::http::HttpTransport;
use cartflow::net::request::{Method, RequestOptions};
use cartflow::net::types::RequestError;
use cartflow::util::location::MemoryLocation;
use cartflow::util::notify::LogSink;
use cartflow::util::schedule::VirtualClock;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Request(#[from] RequestError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0}")]
    Denied(String),
}

#[derive(Parser, Debug)]
#[command(name = "cartflow", about = "Storefront session client")]
struct Cli {
    #[arg(long, env = "CARTFLOW_ORIGIN")]
    origin: Option<String>,

    #[arg(long, env = "CARTFLOW_API_BASE")]
    api_base: Option<String>,

    /// Path and query of the simulated current page.
    #[arg(long, default_value = "/index.html")]
    path: String,

    /// Existing session cookie, e.g. `JSESSIONID=...`.
    #[arg(long, env = "CARTFLOW_SESSION_COOKIE", hide_env_values = true)]
    session_cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh the session and print who is signed in.
    Whoami,
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Run an access guard against `--path`.
    Guard {
        #[arg(value_enum)]
        kind: GuardKind,
    },
    /// Send an arbitrary request through the client.
    Request {
        method: Method,
        url: String,
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GuardKind {
    Login,
    Admin,
}

struct Page {
    storefront: Storefront,
    clock: Rc<VirtualClock>,
    location: Rc<MemoryLocation>,
}

impl Page {
    /// Fast-forward pending timers and report where the page went.
    fn settle(&self) {
        self.clock.run_until_idle();
        for href in self.location.history() {
            println!("-> {href}");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let page = build_page(&cli)?;

    let result = match cli.command {
        Command::Whoami => run_whoami(&page).await,
        Command::Login { username, password } => run_login(&page, &username, &password).await,
        Command::Logout => run_logout(&page).await,
        Command::Guard { kind } => run_guard(&page, kind).await,
        Command::Request { method, url, data } => run_request(&page, method, &url, data).await,
    };
    page.settle();
    result
}

fn build_page(cli: &Cli) -> Result<Page, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(origin) = &cli.origin {
        config.origin.clone_from(origin);
    }
    if let Some(api_base) = &cli.api_base {
        config.api_base.clone_from(api_base);
    }

    let mut transport = HttpTransport::new(&config.origin)?;
    if let Some(cookie) = &cli.session_cookie {
        transport = transport.with_session_cookie(cookie);
    }

    let clock = Rc::new(VirtualClock::new());
    let location = Rc::new(MemoryLocation::new(&cli.path));
    let storefront = Storefront::new(config, Rc::new(transport), clock.clone(), location.clone(), Rc::new(LogSink));
    Ok(Page { storefront, clock, location })
}

async fn run_whoami(page: &Page) -> Result<(), CliError> {
    page.storefront.on_ready().await;
    match page.storefront.session().get() {
        Some(identity) => print_json(&serde_json::to_value(&*identity)?)?,
        None => println!("not signed in"),
    }
    println!("{}", page.storefront.navbar());
    Ok(())
}

async fn run_login(page: &Page, username: &str, password: &str) -> Result<(), CliError> {
    match page.storefront.login(username, password).await {
        FormOutcome::Accepted => {
            println!("{}", page.storefront.navbar());
            Ok(())
        }
        FormOutcome::Rejected { message } => Err(CliError::Denied(message)),
        FormOutcome::Failed => Err(CliError::Denied("login failed".into())),
    }
}

async fn run_logout(page: &Page) -> Result<(), CliError> {
    page.storefront.on_ready().await;
    match page.storefront.logout().await {
        LogoutOutcome::LoggedOut => {
            println!("logged out");
            Ok(())
        }
        LogoutOutcome::Rejected { message } => {
            Err(CliError::Denied(message.unwrap_or_else(|| "logout rejected".into())))
        }
        LogoutOutcome::Failed => Err(CliError::Denied("logout failed".into())),
    }
}

async fn run_guard(page: &Page, kind: GuardKind) -> Result<(), CliError> {
    let guard = page.storefront.guard();
    let allowed = match kind {
        GuardKind::Login => guard.require_login().await,
        GuardKind::Admin => guard.require_admin().await,
    };
    println!("{}", if allowed { "allowed" } else { "denied" });
    Ok(())
}

async fn run_request(page: &Page, method: Method, url: &str, data: Option<String>) -> Result<(), CliError> {
    let mut options = RequestOptions::method(method);
    if let Some(raw) = data {
        let body: Value = serde_json::from_str(&raw)?;
        options = options.with_body(body.to_string());
    }
    let json = page.storefront.client().request(url, options).await?;
    print_json(&json)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
