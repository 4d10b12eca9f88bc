use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hacs_lifecycle::config::{self, Config};
use hacs_lifecycle::context::HacsContext;
use hacs_lifecycle::host::LocalHost;
use hacs_lifecycle::repository::lifecycle::validate_tracked;
use hacs_lifecycle::repository::name::{display_name, repository_from_url};
use hacs_lifecycle::repository::{Category, Repository};
use hacs_lifecycle::scheduler::Scheduler;
use hacs_lifecycle::source::GitHubClient;
use hacs_lifecycle::source::github::DEFAULT_BASE_URL;
use hacs_lifecycle::store::{RepositoryStore, SqliteStore, StoredRepository};
use hacs_lifecycle::system::{Stage, System};
use hacs_lifecycle::task::TaskManager;
use hacs_lifecycle::task::tasks::store_repositories;

#[derive(Parser)]
#[command(name = "hacs-lifecycle")]
#[command(version, about = "Lifecycle engine for community repositories")]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write log records as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the background engine until interrupted
    Run,
    /// Validate a single repository
    Validate {
        /// `owner/name` or repository URL
        repository: String,
        #[arg(long, default_value = "integration", value_parser = parse_category)]
        category: Category,
        /// Stop at the first failure
        #[arg(long)]
        action: bool,
    },
    /// Start tracking a repository
    Add {
        /// `owner/name` or repository URL
        repository: String,
        #[arg(long, value_parser = parse_category)]
        category: Category,
    },
    /// Stop tracking a repository
    Remove {
        /// `owner/name` or repository URL
        repository: String,
    },
    /// List tracked repositories
    List,
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|_| {
        let known: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        format!("unknown category {:?}, expected one of {}", value, known.join(", "))
    })
}

fn init_logging(json: bool) -> anyhow::Result<WorkerGuard> {
    let log_dir = config::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;
    let (file, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "hacs-lifecycle.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(json.then(|| fmt::layer().json().with_writer(file.clone())))
        .with((!json).then(|| fmt::layer().with_ansi(false).with_writer(file)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(guard)
}

fn build_context(config: Config, action: bool) -> anyhow::Result<Arc<HacsContext>> {
    std::fs::create_dir_all(config::data_dir())?;

    let client = GitHubClient::new(
        DEFAULT_BASE_URL,
        config.token.as_deref(),
        Duration::from_millis(config.scan.fetch_timeout_ms),
    )?;
    let store = SqliteStore::new(&config::db_path())?;
    let host = LocalHost::new(&config.host_config_path());

    Ok(Arc::new(HacsContext::new(
        config,
        Arc::new(System::new(action)),
        Arc::new(client),
        Arc::new(store),
        Arc::new(host),
    )))
}

fn repository_name(input: &str) -> anyhow::Result<String> {
    repository_from_url(input).ok_or_else(|| anyhow!("Invalid repository {:?}", input))
}

/// Simulate the host lifecycle and run scheduled passes until Ctrl-C
async fn run(ctx: Arc<HacsContext>) -> anyhow::Result<()> {
    let tasks = Arc::new(TaskManager::with_builtin_tasks(ctx.clone()));

    ctx.system.set_stage(Stage::Setup);
    if let Err(e) = tasks.async_load().await {
        error!("Failed to load tasks: {}", e);
    }

    ctx.system.set_stage(Stage::Startup);
    tasks.async_execute_startup_tasks().await;

    ctx.system.fire_started();
    ctx.system.set_stage(Stage::Running);

    let (shutdown, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(Scheduler::new(ctx.clone(), tasks.clone()).run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    shutdown.send(true)?;
    scheduler.await?;

    if let Some(task) = tasks.get(store_repositories::SLUG).await {
        task.execute(&ctx).await?;
    }
    Ok(())
}

async fn validate(ctx: Arc<HacsContext>, full_name: String, category: Category) -> anyhow::Result<()> {
    ctx.system.set_stage(Stage::Running);
    let repository = ctx
        .repositories
        .register(Repository::new(&full_name, category))
        .await;

    let success = validate_tracked(&repository, &ctx).await?;
    let repository = repository.lock().await;
    if !success {
        bail!(
            "{} is not compliant: {}",
            repository.data.full_name,
            repository.validate.errors.join("; ")
        );
    }

    println!("{} ({}) is compliant", display_name(&repository), category);
    Ok(())
}

async fn add(ctx: Arc<HacsContext>, full_name: String, category: Category) -> anyhow::Result<()> {
    if let Some(existing) = ctx.store.get_repository(&full_name)? {
        bail!("{} is already tracked as {}", existing.full_name, existing.category);
    }

    let repository = ctx
        .repositories
        .register(Repository::new(&full_name, category))
        .await;
    if !validate_tracked(&repository, &ctx).await? {
        let repository = repository.lock().await;
        bail!(
            "{} could not be added: {}",
            full_name,
            repository.validate.errors.join("; ")
        );
    }

    let repository = repository.lock().await;
    ctx.store
        .save_repository(&StoredRepository::new(&repository.data.full_name, category))?;
    println!("Added {} ({})", display_name(&repository), category);
    Ok(())
}

fn remove(ctx: &HacsContext, full_name: &str) -> anyhow::Result<()> {
    if !ctx.store.remove_repository(full_name)? {
        bail!("{} is not tracked", full_name);
    }
    println!("Removed {}", full_name);
    Ok(())
}

fn list(ctx: &HacsContext) -> anyhow::Result<()> {
    for repository in ctx.store.list_repositories()? {
        println!(
            "{:<40} {:<14} {:<12}{}",
            repository.full_name,
            repository.category,
            repository.version_local.as_deref().unwrap_or("-"),
            if repository.pending_restart {
                " (restart pending)"
            } else {
                ""
            }
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_json)?;

    let config_file = cli.config.unwrap_or_else(config::config_path);
    let config = Config::load(&config_file)
        .with_context(|| format!("Failed to load config from {:?}", config_file))?;
    let action = matches!(cli.command, Command::Validate { action: true, .. });
    let ctx = build_context(config, action)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Run => runtime.block_on(run(ctx)),
        Command::Validate {
            repository,
            category,
            ..
        } => runtime.block_on(validate(ctx, repository_name(&repository)?, category)),
        Command::Add {
            repository,
            category,
        } => runtime.block_on(add(ctx, repository_name(&repository)?, category)),
        Command::Remove { repository } => remove(&ctx, &repository_name(&repository)?),
        Command::List => list(&ctx),
    }
}
