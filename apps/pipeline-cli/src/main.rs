mod args;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use erp_gateway::ErpGateway;
use sales_pipeline::{LeadBoard, LocalClient, MoveOutcome, PipelineConfig, Service, SystemClock};
use sales_pipeline_sdk::PipelineClient;
use serde::Serialize;
use serde_json::json;

use crate::args::{FunnelArgs, LeadArgs, StageArgs};

/// Sales pipeline board operations against the ERP gateway
#[derive(Parser)]
#[command(name = "pipeline-cli", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML); `PIPELINE__*` env vars override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active funnels
    Funnels,
    /// List active stages of a funnel in order
    Stages { funnel_id: String },
    /// Create or update a funnel
    SaveFunnel(FunnelArgs),
    /// Deactivate a funnel
    DeleteFunnel { id: String },
    /// Create or update a stage
    SaveStage(StageArgs),
    /// Deactivate a stage
    DeleteStage { id: String },
    /// List active leads, optionally one stage's column
    Leads {
        #[arg(long)]
        stage: Option<String>,
        /// Case-insensitive match on name or description
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create or update a lead
    SaveLead(LeadArgs),
    /// Move a lead to another stage
    MoveLead { lead_id: String, stage_id: String },
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;

    if matches!(cli.command, Commands::Check) {
        return check(&config);
    }

    let client = build_client(&config)?;
    run(&client, cli.command).await
}

fn build_client(config: &PipelineConfig) -> Result<LocalClient<ErpGateway>> {
    let gateway = ErpGateway::new(&config.gateway).context("building gateway client")?;
    let service = Service::new(
        Arc::new(gateway),
        Arc::new(SystemClock),
        config.service_config(),
    );
    Ok(LocalClient::new(Arc::new(service)))
}

async fn run<C: PipelineClient>(client: &C, command: Commands) -> Result<()> {
    match command {
        Commands::Funnels => print(&client.list_funnels().await),
        Commands::Stages { funnel_id } => print(&client.list_stages(&funnel_id).await),
        Commands::SaveFunnel(args) => print(&client.save_funnel(args.into()).await?),
        Commands::DeleteFunnel { id } => {
            client.delete_funnel(&id).await?;
            print(&json!({ "deactivated": id }))
        }
        Commands::SaveStage(args) => print(&client.save_stage(args.into()).await?),
        Commands::DeleteStage { id } => {
            client.delete_stage(&id).await?;
            print(&json!({ "deactivated": id }))
        }
        Commands::Leads { stage, search } => {
            let mut board = LeadBoard::default();
            board.refresh(client).await;
            match stage {
                Some(stage) => print(&board.leads_in_stage(&stage, &search)),
                None => print(&board.leads()),
            }
        }
        Commands::SaveLead(args) => print(&client.save_lead(args.into()).await?),
        Commands::MoveLead { lead_id, stage_id } => {
            let mut board = LeadBoard::default();
            board.refresh(client).await;
            match board.move_lead(client, &lead_id, &stage_id).await? {
                MoveOutcome::Moved { from } => {
                    print(&json!({ "lead_id": lead_id, "from": from, "to": stage_id }))
                }
                MoveOutcome::Unchanged => {
                    print(&json!({ "lead_id": lead_id, "unchanged": stage_id }))
                }
                MoveOutcome::NotOnBoard => {
                    anyhow::bail!("lead {lead_id} is not among the active leads")
                }
            }
        }
        Commands::Check => Ok(()),
    }
}

fn check(config: &PipelineConfig) -> Result<()> {
    tracing::info!("configuration loaded");
    println!("Configuration is valid");
    print(&json!({
        "login_url": config.gateway.login_url.as_str(),
        "load_records_url": config.gateway.load_records_url.as_str(),
        "save_url": config.gateway.save_url.as_str(),
        "username": config.gateway.credentials.username,
        "login_timeout_ms": millis(config.gateway.login_timeout),
        "request_timeout_ms": config.gateway.request_timeout.map(millis),
        "default_color": config.default_color,
    }))
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
