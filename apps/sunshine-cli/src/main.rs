use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use psico_agenda::domain::events::DashboardEvent;
use psico_agenda::domain::registration::{Field, SubmitOutcome};
use psico_agenda::infra::notify::{Notice, RecordingNotifier};
use psico_agenda::model::Role;
use psico_agenda::PsicoAgenda;
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

mod render;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Sunshine PsicoAgenda - psychologist dashboard and account registration
#[derive(Parser)]
#[command(name = "sunshine-cli")]
#[command(about = "Sunshine PsicoAgenda - psychologist dashboard and account registration")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard of a psychologist and keep it refreshed
    Dashboard {
        /// Psychologist user id
        #[arg(short, long, default_value = "p1")]
        user: String,
        /// Stop after this many refresh events (0 = until Ctrl-C)
        #[arg(long, default_value_t = 1)]
        cycles: u64,
        /// Simulate a window focus regain after every N refresh events (0 = never)
        #[arg(long, default_value_t = 0)]
        focus_every: u64,
    },
    /// Create a patient or psychologist account
    Register(RegisterArgs),
    /// Check configuration
    Check,
}

#[derive(Args)]
struct RegisterArgs {
    /// paciente | psicologo
    #[arg(long, default_value = "paciente")]
    role: Role,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    password: String,
    /// Password confirmation
    #[arg(long, default_value = "")]
    confirm: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    birth_date: String,
    #[arg(long, default_value = "")]
    crp: String,
    #[arg(long, default_value = "")]
    specialty: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs { verbose: cli.verbose };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::info!("{} starting", config.app.name);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Dashboard {
            user,
            cycles,
            focus_every,
        } => run_dashboard(config, &user, cycles, focus_every).await,
        Commands::Register(register) => run_register(config, register).await,
        Commands::Check => check_config(config),
    }
}

fn init_module(config: AppConfig) -> Result<PsicoAgenda> {
    let home_dir = PathBuf::from(&config.app.home_dir);
    let provider = AppConfigProvider::new(config);
    PsicoAgenda::init(&provider, &home_dir)
}

async fn run_dashboard(config: AppConfig, user_id: &str, cycles: u64, focus_every: u64) -> Result<()> {
    let module = init_module(config)?;
    let session = module.sign_in(user_id)?;
    tracing::info!(user_id = %session.user.id, "signed in");

    let mut events = module.events().subscribe();
    let cancel = CancellationToken::new();
    let (dashboard, handle) = module.mount_dashboard(cancel.child_token())?;

    let mut seen = 0u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(DashboardEvent::Refreshed { trigger, .. }) => {
                    seen += 1;
                    println!("{}", render::dashboard(&dashboard.view(), trigger));
                }
                Ok(DashboardEvent::RefreshFailed { trigger, reason, .. }) => {
                    seen += 1;
                    eprintln!("Erro ao carregar dados: {reason}");
                    println!("{}", render::dashboard(&dashboard.view(), trigger));
                }
                Ok(DashboardEvent::StaleDiscarded { .. }) => continue,
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "dashboard events lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            }
        }

        if cycles > 0 && seen >= cycles {
            break;
        }
        if focus_every > 0 && seen % focus_every == 0 {
            handle.focus();
        }
    }

    cancel.cancel();
    handle.shutdown().await;
    Ok(())
}

async fn run_register(config: AppConfig, args: RegisterArgs) -> Result<()> {
    let module = init_module(config)?;
    let notifier = Arc::new(RecordingNotifier::new());
    let form = module.registration(notifier.clone());

    form.set_role(args.role);
    for (field, value) in [
        (Field::Name, args.name),
        (Field::Email, args.email),
        (Field::Password, args.password),
        (Field::ConfirmPassword, args.confirm),
        (Field::Phone, args.phone),
        (Field::BirthDate, args.birth_date),
        (Field::Crp, args.crp),
        (Field::Specialty, args.specialty),
    ] {
        form.set_field(field, value);
    }

    let outcome = form.submit().await;
    for notice in notifier.drain() {
        match notice {
            Notice::Success(m) => println!("{m}"),
            Notice::Error(m) => eprintln!("{m}"),
        }
    }

    match outcome {
        SubmitOutcome::Registered(user) => {
            println!("{}", render::user(&user));
            Ok(())
        }
        SubmitOutcome::Invalid(e) => bail!("registration rejected: {e}"),
        SubmitOutcome::Failed(e) => bail!("registration failed: {e}"),
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let home_dir = PathBuf::from(&config.app.home_dir);
    let yaml = config.to_yaml()?;
    let provider = AppConfigProvider::new(config);
    let module = PsicoAgenda::init(&provider, &home_dir)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{yaml}");
    println!(
        "psico_agenda: refresh every {:?}, upcoming limit {}, stale policy {:?}",
        module.config().refresh_interval,
        module.config().upcoming_limit,
        module.config().stale_policy
    );
    Ok(())
}
