use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, ClientSession, Clock, CsvExport, ExportService, LeaderboardService,
    ServiceSettings, SessionLoopService,
};
use ui::{App, UiApp, build_app_context};
use vote_core::model::{LanguageCode, Respondent};

mod cli;
mod config;
mod db;

use cli::{Cli, Command, ExportArgs, ExportKindArg};
use config::AppConfig;
use db::{normalize_sqlite_url, prepare_sqlite_file};

struct DesktopApp {
    services: AppServices,
    export_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn session_loop(&self) -> Arc<SessionLoopService> {
        self.services.session_loop()
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        self.services.leaderboard()
    }

    fn exports(&self) -> Arc<ExportService> {
        self.services.exports()
    }

    fn new_client(&self) -> ClientSession {
        self.services.new_client()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("pairvote error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = AppConfig::load(&cli.overrides).context("failed to load configuration")?;
    let db_url = normalize_sqlite_url(&config.db_url);
    prepare_sqlite_file(&db_url)?;

    let respondent = config
        .respondent
        .as_deref()
        .map(Respondent::from_trusted)
        .transpose()
        .context("invalid preset respondent")?;
    let settings = ServiceSettings {
        csv_path: config.csv_path.clone(),
        languages: config.languages.clone(),
        respondent,
    };

    let services = AppServices::new_sqlite(&db_url, Clock::system(), settings)
        .await
        .with_context(|| format!("failed to open vote store {db_url}"))?;
    tracing::info!(db = %db_url, csv = %config.csv_path.display(), "vote store ready");

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            launch_ui(services, config.export_dir);
            Ok(())
        }
        Command::Export(args) => {
            let export = build_export(&services, &args).await?;
            let dir = args.out.unwrap_or(config.export_dir);
            let path = export.write_to(&dir)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn launch_ui(services: AppServices, export_dir: PathBuf) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        export_dir,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("AB Battle")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

async fn build_export(services: &AppServices, args: &ExportArgs) -> anyhow::Result<CsvExport> {
    let exports = services.exports();
    let language = || -> anyhow::Result<LanguageCode> {
        let Some(raw) = args.lang.as_deref() else {
            bail!("--lang is required for this export");
        };
        LanguageCode::new(raw).with_context(|| format!("invalid --lang value: {raw}"))
    };

    let export = match args.kind {
        ExportKindArg::Mine => {
            let Some(email) = args.email.as_deref() else {
                bail!("--email is required for --kind mine");
            };
            let respondent = Respondent::from_trusted(email).context("invalid --email value")?;
            exports.my_votes(&respondent, &language()?).await?
        }
        ExportKindArg::Stats => exports.item_stats(&language()?).await?,
        ExportKindArg::Raw => exports.raw_votes(&language()?).await?,
        ExportKindArg::All => exports.all_votes().await?,
    };
    Ok(export)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PAIRVOTE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
