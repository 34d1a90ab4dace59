// codegen-preview: Terminal preview of generated workflow client code
// License: Apache-2.0

use clap::{Args, Parser, Subcommand};
use codegen_preview::clipboard::TerminalClipboard;
use codegen_preview::config::Config;
use codegen_preview::driver::Driver;
use codegen_preview::format::Format;
use codegen_preview::highlight::pretty_payload;
use codegen_preview::orchestrator::Mode;
use codegen_preview::service::http::HttpService;
use codegen_preview::tui::app::{ActivityLog, App};
use codegen_preview::workflow::WorkflowDefinition;
use std::path::PathBuf;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "codegen-preview",
    about = "Preview client code and payloads for a workflow execution server",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive preview (default)
    Tui {
        #[command(flatten)]
        preview: PreviewArgs,
    },
    /// Generate code once and print it
    Generate {
        #[command(flatten)]
        preview: PreviewArgs,
        /// Print the JSON payload instead of the code
        #[arg(long)]
        payload: bool,
    },
    /// Print the sample workflow sent to the service
    Workflow {
        /// List only the fields the caller supplies at execution time
        #[arg(long)]
        fields: bool,
    },
    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct PreviewArgs {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,
    /// Address of the code-generation service
    #[arg(long)]
    service_url: Option<String>,
    /// Base URL of the workflow execution server, embedded in the generated code
    #[arg(short, long)]
    base_url: Option<String>,
    /// Initial format: curl, python, js or ts
    #[arg(short, long)]
    format: Option<Format>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Tui { preview }) => tui_cmd(preview).await,
        None => tui_cmd(PreviewArgs::default()).await,
        Some(Commands::Generate { preview, payload }) => {
            codegen_preview::logger::init();
            generate_cmd(preview, payload).await
        }
        Some(Commands::Workflow { fields }) => workflow_cmd(fields),
        Some(Commands::Version) => {
            version_cmd();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn tui_cmd(args: PreviewArgs) -> anyhow::Result<()> {
    let log = ActivityLog::new();
    codegen_preview::logger::init_tui(log.clone());

    let driver = start_driver(&args)?;
    let app = App::new(driver, Box::new(TerminalClipboard), log)?;
    codegen_preview::tui::run(app).await
}

async fn generate_cmd(args: PreviewArgs, payload: bool) -> anyhow::Result<()> {
    let mut driver = start_driver(&args)?;

    match &driver.settle().await.mode {
        Mode::Success(result) if payload => println!("{}", pretty_payload(&result.payload)),
        Mode::Success(result) => println!("{}", result.code),
        Mode::Failure(message) => anyhow::bail!("{}", message),
        Mode::Loading => anyhow::bail!("request did not complete"),
    }
    Ok(())
}

fn workflow_cmd(fields: bool) -> anyhow::Result<()> {
    let workflow = WorkflowDefinition::sample();
    if fields {
        for field in workflow.user_dependent_fields() {
            println!("{}", field);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&workflow)?);
    }
    Ok(())
}

fn version_cmd() {
    println!("codegen-preview v{}", codegen_preview::VERSION);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(args: &PreviewArgs) -> anyhow::Result<Config> {
    let config_path = if let Some(p) = &args.config {
        PathBuf::from(p)
    } else {
        Config::default_path().unwrap_or_else(|_| PathBuf::from("config.json"))
    };

    let mut cfg = Config::load(&config_path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        Config::default()
    });

    if let Some(url) = &args.service_url {
        cfg.service.url = url.clone();
    }
    if let Some(base_url) = &args.base_url {
        cfg.preview.base_url = base_url.clone();
    }
    if let Some(format) = args.format {
        cfg.preview.format = format;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn start_driver(args: &PreviewArgs) -> anyhow::Result<Driver> {
    let cfg = load_config(args)?;

    tracing::info!(
        service = %cfg.service.url,
        format = %cfg.preview.format,
        base_url = %cfg.preview.base_url,
        "Starting preview session"
    );

    let service = HttpService::new(cfg.service.url.clone(), cfg.service.timeout())?;
    Ok(Driver::start(
        Arc::new(service),
        WorkflowDefinition::sample(),
        cfg.preview.format,
        cfg.preview.base_url,
    ))
}
