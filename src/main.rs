mod cli;

use std::net::SocketAddr;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use labdash::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use labdash::models::AppState;

use cli::{CliContext, ContainerCommands, ImageCommands, K8sCommands, SshCommands, TemplateCommands, UserCommands};

fn build_http_client() -> reqwest::Client {
    match reqwest::Client::builder()
        .user_agent(format!("labdash/{}", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(c) => c,
        Err(e) => cli::fail(format!("Failed to create HTTP client: {}", e)),
    }
}

fn build_state_from_env() -> AppState {
    let mut state = AppState::new(build_http_client(), config::get_api_base_url());
    state.public_base_url = config::get_public_base_url();
    state.refresh_interval = config::get_refresh_interval();
    state
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match tokio::fs::read_to_string(&path).await {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", Paint::new("Failed to read custom stylesheet at").red(), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", Paint::new("Invalid host/port format").red(), e);
            process::exit(1);
        }
    };
    tracing::info!(%addr, api = %state.api_base_url, "Starting labdash server");
    let app = labdash::build_app(state);
    println!(
        "{} {}",
        Paint::new("Dashboard running on").green(),
        Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                Paint::new("Stop the process using this port, or pass a different --port.").yellow()
            );
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "labdash",
    author,
    version,
    about = "Dashboard and CLI for Kubernetes-backed student dev containers",
    long_about = r#"labdash talks to the lab platform's REST API on behalf of students, teachers and administrators.

Run `labdash serve` for the web dashboard, or use the subcommands to do the same work from a terminal. The CLI keeps its session in a file (SESSION_FILE, default ~/.labdash/session.json).

Examples:
  1) Start the dashboard:
      labdash serve --host 127.0.0.1 --port 3000
  2) Sign in and list your containers:
      labdash login alice
      labdash containers mine
  3) Watch the dashboard:
      labdash dashboard --watch
"#,
    after_help = "Use `labdash <subcommand> --help` for subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    #[command(
        about = "Validate configuration and the stored session",
        long_about = "Print the effective configuration, check that API_BASE_URL parses, and if a session exists, check that the backend still accepts its token."
    )]
    CheckConfig,
    /// Sign in and store the session
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Also fetch the profile from the backend
        #[arg(long)]
        remote: bool,
    },
    #[command(about = "Show the dashboard summary", long_about = "Show the same summary the web dashboard shows. With --watch it refreshes every REFRESH_INTERVAL_SECS seconds until Ctrl-C.")]
    Dashboard {
        #[arg(long)]
        watch: bool,
    },
    #[command(about = "Manage containers (list, create, start, stop, delete, ssh-info, logs)")]
    Containers {
        #[command(subcommand)]
        sub: ContainerCommands,
    },
    #[command(about = "Manage container templates")]
    Templates {
        #[command(subcommand)]
        sub: TemplateCommands,
    },
    #[command(about = "Manage image templates")]
    Images {
        #[command(subcommand)]
        sub: ImageCommands,
    },
    #[command(about = "Open, list and revoke SSH connections")]
    Ssh {
        #[command(subcommand)]
        sub: SshCommands,
    },
    #[command(
        about = "Kubernetes namespaces, pods and deployments",
        long_about = "Direct access to the backend's Kubernetes endpoints. These commands mutate cluster state; deleting a namespace deletes everything in it."
    )]
    K8s {
        #[command(subcommand)]
        sub: K8sCommands,
    },
    #[command(about = "Manage users and students")]
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }
    if cli.silent {
        labdash::api::set_silent(true);
    }
    config::load_env_file(cli.env_file.as_deref());

    let Some(command) = cli.command else {
        start_server(build_state_from_env(), DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };

    let ctx = || CliContext::load(build_http_client());
    match command {
        Commands::Serve { host, port, stylesheet } => {
            start_server(build_state_from_env(), &host, port, stylesheet).await;
        }
        Commands::CheckConfig => cli::check_config(&ctx()).await,
        Commands::Login { username, password } => cli::login(&ctx(), username, password).await,
        Commands::Logout => cli::logout(&ctx()),
        Commands::Whoami { remote } => cli::whoami(&ctx(), remote).await,
        Commands::Dashboard { watch } => cli::dashboard(&ctx(), watch).await,
        Commands::Containers { sub } => cli::containers(&ctx(), sub).await,
        Commands::Templates { sub } => cli::templates(&ctx(), sub).await,
        Commands::Images { sub } => cli::images(&ctx(), sub).await,
        Commands::Ssh { sub } => cli::ssh(&ctx(), sub).await,
        Commands::K8s { sub } => cli::kubernetes(&ctx(), sub).await,
        Commands::Users { sub } => cli::users(&ctx(), sub).await,
    }
}
