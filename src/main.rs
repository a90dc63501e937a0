mod cli;

use cli::output::Output;
use cli::{Cli, Commands};
use lexis::utils::toml_config::{LexisConfig, LogFormat, LoggingConfig};
use lexis::{ClientError, Lexis};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("{:#}", err));
            let auth_failure = err
                .downcast_ref::<ClientError>()
                .map(ClientError::is_auth_failure)
                .unwrap_or(false);
            if auth_failure {
                output.hint("Your session has expired. Run `lexis login` to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    if let Commands::Init {
        path,
        force,
        base_url,
        memory,
    } = cli.command
    {
        let result = cli::init::run(
            cli::init::InitConfig {
                path,
                force,
                base_url,
                memory_storage: memory,
            },
            output,
        );
        return match result {
            cli::init::InitResult::Success | cli::init::InitResult::AlreadyExists => Ok(()),
            cli::init::InitResult::Error(e) => Err(anyhow::anyhow!(e)),
        };
    }

    let config = LexisConfig::load_with_env(&cli.config)?;
    init_tracing(&config.logging, cli.verbose);

    #[cfg(feature = "mock-server")]
    if let Commands::MockServer { host, port } = &cli.command {
        return run_mock_server(&config, host.clone(), *port, output).await;
    }

    let lexis = Lexis::from_config(&config)?;
    dispatch(cli.command, &lexis, output).await
}

async fn dispatch(command: Commands, lexis: &Lexis, output: &Output) -> anyhow::Result<()> {
    use cli::commands;

    match command {
        Commands::Login { email, password } => commands::login(lexis, output, email, password).await,
        Commands::Register {
            username,
            email,
            password,
            role,
        } => {
            let request = commands::registration(username, email, password, role.into())?;
            commands::register(lexis, output, request).await
        }
        Commands::Logout => commands::logout(lexis, output),
        Commands::Whoami { refresh } => commands::whoami(lexis, output, refresh).await,
        Commands::Dashboard => commands::dashboard(lexis, output).await,
        Commands::Documents(command) => commands::documents(lexis, output, command).await,
        Commands::Comments(command) => commands::comments(lexis, output, command).await,
        Commands::Versions(command) => commands::versions(lexis, output, command).await,
        Commands::Notifications(command) => commands::notifications(lexis, output, command).await,
        Commands::Activity { kind } => commands::activity(lexis, output, kind).await,
        Commands::Share(command) => commands::share(lexis, output, command).await,
        Commands::Clients(command) => commands::clients(lexis, output, command).await,
        Commands::Subscription(command) => commands::subscription(lexis, output, command).await,
        Commands::Init { .. } => Ok(()),
        #[cfg(feature = "mock-server")]
        Commands::MockServer { .. } => Ok(()),
    }
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match logging.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

#[cfg(feature = "mock-server")]
async fn run_mock_server(
    config: &LexisConfig,
    host: Option<String>,
    port: Option<u16>,
    output: &Output,
) -> anyhow::Result<()> {
    use anyhow::Context;
    use std::net::SocketAddr;
    use std::time::Duration;

    let host = host.unwrap_or_else(|| config.mock.host.clone());
    let port = port.unwrap_or(config.mock.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    output.banner();
    output.info(&format!("Mock backend listening on http://{}/api/", addr));
    output.header("Seeded accounts");
    for account in lexis_mock::SEEDED_ACCOUNTS {
        output.kv(account.role, &format!("{} / {}", account.email, account.password));
    }
    output.newline();

    let options = lexis_mock::MockOptions {
        access_ttl: Duration::from_secs(config.mock.access_ttl_secs),
        ..Default::default()
    };
    lexis_mock::serve(addr, options)
        .await
        .context("Mock backend stopped")
}
