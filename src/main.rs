use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pattern_check::check::{CheckConfig, FlowLoader, PatternCheckAction};
use pattern_check::runner::models::{Execution, ExecutionStep, FlowAction, Payload};
use pattern_check::runner::{
    ActionContext, ActionRegistry, LogReporter, MemoryReporter, StepOutcome, StepReporter,
};

use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a payload against a flow's patterns
    Check {
        /// Path to the flow definition (YAML or JSON)
        #[arg(short, long)]
        flow: String,

        /// Path to the payload JSON file
        #[arg(short, long)]
        payload: String,

        /// Stream step updates to the log (at `info`) instead of printing them at the end
        #[arg(long = "log")]
        log_updates: bool,
    },
    /// Print plugin and action details as JSON
    Details,
}

fn exit_code(outcome: StepOutcome) -> ExitCode {
    match outcome {
        StepOutcome::Continue => ExitCode::SUCCESS,
        StepOutcome::Failed => ExitCode::from(1),
        StepOutcome::NoPatternMatch => ExitCode::from(2),
        StepOutcome::Canceled => ExitCode::from(3),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = CheckConfig::from_env()?;

    let registry = ActionRegistry::new();
    registry
        .register(Arc::new(PatternCheckAction::new(config.clone())))
        .await;

    match args.command {
        Commands::Details => {
            let action = registry
                .get(&config.action_type)
                .await
                .ok_or("pattern check action is not registered")?;
            let details = serde_json::json!({
                "plugin": action.info(),
                "action": action.details(),
            });
            println!("{}", serde_json::to_string_pretty(&details)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            flow,
            payload,
            log_updates,
        } => {
            let flow = FlowLoader::new().load_flow(&flow)?;
            let data: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&payload)?)?;

            // Flows without explicit actions still get the pattern check step
            let action_def = flow
                .actions
                .iter()
                .find(|a| a.action_type == config.action_type)
                .cloned()
                .unwrap_or_else(|| FlowAction::new(config.action_type.clone()));

            let action = registry
                .get(&action_def.action_type)
                .await
                .ok_or_else(|| format!("Action '{}' not found", action_def.action_type))?;

            let execution = Execution::new(flow.flow_id());
            let payload = Payload::new(flow.flow_id(), data);
            let step = ExecutionStep::new();
            let memory = MemoryReporter::new();
            let log_reporter = LogReporter::new();
            let reporter: &dyn StepReporter = if log_updates { &log_reporter } else { &memory };

            log::info!(
                "Running {} for flow '{}' (execution {})",
                action_def.action_type,
                flow.name,
                execution.id
            );

            let ctx = ActionContext {
                execution: &execution,
                flow: &flow,
                payload: &payload,
                step: &step,
                action: &action_def,
                reporter,
            };
            let result = action.execute(&ctx).await;

            if !log_updates {
                for message in memory.messages(step.id).await {
                    println!("{}", message);
                }
            }
            println!("Outcome: {}", result.outcome);

            Ok(exit_code(result.outcome))
        }
    }
}
