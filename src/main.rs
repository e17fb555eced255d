use anyhow::{Context, Result};
use council::cli::commands::{HistoryCommand, RunCommand, ValidateCommand};
use council::cli::output::*;
use council::cli::{Cli, Command};
use council::core::CouncilConfig;
use council::reasoning::{GeminiClient, ReasoningClientConfig};
use council::store::{MarketSignal, MemoryRetailStore, Product, RetailStore};
use council::workflow::{self, WORKFLOW_NAME};
use council::{AccessMode, Council, PipelineState, ToolAccessPolicy};
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = match &cli.config {
        Some(path) => CouncilConfig::from_file(path)?,
        None => CouncilConfig::default(),
    };

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_workflow(cmd, &config).await?,
        Command::Validate(cmd) => validate_workflow(cmd)?,
        Command::History(cmd) => show_history(cmd, &config).await?,
    }

    Ok(())
}

/// Open the retail store: seeded in-memory for demo runs, SQLite otherwise
async fn open_store(config: &CouncilConfig, memory: bool) -> Result<Arc<dyn RetailStore>> {
    if memory {
        let store = MemoryRetailStore::new();
        seed_demo(&store).await;
        return Ok(Arc::new(store));
    }
    open_configured_store(config).await
}

#[cfg(feature = "sqlite")]
async fn open_configured_store(config: &CouncilConfig) -> Result<Arc<dyn RetailStore>> {
    let store = match &config.store.db_path {
        Some(path) => council::store::SqliteRetailStore::new(path).await?,
        None => council::store::SqliteRetailStore::with_default_path().await?,
    };
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite"))]
async fn open_configured_store(_config: &CouncilConfig) -> Result<Arc<dyn RetailStore>> {
    anyhow::bail!("this build has no sqlite support; run with --memory")
}

/// Demo data: one product clearly undercut, one that is not
async fn seed_demo(store: &MemoryRetailStore) {
    store
        .seed_products(vec![
            Product {
                product_id: "P1".to_string(),
                name: "Widget".to_string(),
                cost_price: 10.0,
                current_stock: 120,
            },
            Product {
                product_id: "P2".to_string(),
                name: "Doohickey".to_string(),
                cost_price: 4.5,
                current_stock: 40,
            },
        ])
        .await;
    store
        .seed_signals(vec![
            MarketSignal {
                product_id: "P1".to_string(),
                competitor_name: "Acme".to_string(),
                detected_price: 8.0,
            },
            MarketSignal {
                product_id: "P2".to_string(),
                competitor_name: "Globex".to_string(),
                detected_price: 6.0,
            },
        ])
        .await;
}

async fn run_workflow(cmd: &RunCommand, config: &CouncilConfig) -> Result<()> {
    let units = workflow::executive_council();
    workflow::validate_sequence(&units).context("Workflow wiring is invalid")?;

    let store = open_store(config, cmd.memory).await?;
    let policy = ToolAccessPolicy::new(store);

    let api_key = std::env::var(&config.reasoning.api_key_env).with_context(|| {
        format!(
            "Reasoning API key not set: export {}",
            config.reasoning.api_key_env
        )
    })?;
    let client_config = ReasoningClientConfig::new(api_key)
        .with_api_base(config.reasoning.api_base.clone())
        .with_model(config.reasoning.model.clone())
        .with_max_tool_rounds(config.reasoning.max_tool_rounds);
    let client = GeminiClient::new(client_config);

    let mut council = Council::new(
        WORKFLOW_NAME,
        units,
        client,
        policy,
        config.reasoning.timeout_secs,
    );
    council.add_event_handler(|event| println!("{}", format_execution_event(event)));

    println!();
    let run = council.execute(PipelineState::new()).await;

    if cmd.json {
        let data = serde_json::json!({
            "final_state": run.final_state,
            "terminal_output": run.terminal_output,
            "execution_record": run.record,
        });
        println!("\n{}", serde_json::to_string_pretty(&data)?);
    } else if let Some(report) = &run.terminal_output {
        println!("\n{}", report.render());
    }

    match &run.failure {
        None => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(WORKFLOW_NAME).bold(),
                style("successfully").green()
            );
            Ok(())
        }
        Some(failure) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(WORKFLOW_NAME).bold(),
                style("failed").red()
            );
            error!("{}", failure);
            std::process::exit(1);
        }
    }
}

fn validate_workflow(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating workflow...", INFO);

    let units = workflow::executive_council();
    match workflow::validate_sequence(&units) {
        Ok(()) => {
            println!("{} Workflow wiring is valid!", CHECK);
            for spec in &units {
                println!("{}", format_unit_spec(spec));
            }

            if cmd.json {
                let data: Vec<_> = units
                    .iter()
                    .map(|spec| {
                        serde_json::json!({
                            "name": spec.name,
                            "store_access": spec.store_access,
                            "output_key": spec.output_key,
                            "inputs": spec.template.required_keys(),
                        })
                    })
                    .collect();
                println!("\n{}", serde_json::to_string_pretty(&data)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

async fn show_history(cmd: &HistoryCommand, config: &CouncilConfig) -> Result<()> {
    let store = open_store(config, false).await?;
    let reader = ToolAccessPolicy::new(store).bind(AccessMode::ReadOnly);

    let debates = reader.recent_debates(cmd.limit).await?;

    if debates.is_empty() {
        println!("{} No council debates logged yet", INFO);
        return Ok(());
    }

    if cmd.json {
        let data = serde_json::json!({ "debates": debates });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("{} Logged debates (latest {}):", INFO, cmd.limit);
        for debate in &debates {
            println!("  {}", format_debate(debate));
        }
    }

    Ok(())
}
