use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

use climate_runtime::ResponseEnvelope;
use climate_sim::{
    load_model_config_from_env, sweep, Challenge, Insights, PolicyStrength, SimulationEngine,
    SimulationParameters, SweepRequest,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Climate simulation engine command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print its outcomes.
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Include synergy tip, benchmark tier and suggestions.
        #[arg(long)]
        insights: bool,
    },
    /// Run one simulation and print every intermediate model term.
    Explain {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Rank a grid of solar/wind mixes by synergy score.
    Sweep {
        #[arg(long, default_value = "reduce_emissions")]
        challenge: String,
        #[arg(long, default_value = "moderate")]
        policy: PolicyStrength,
        #[arg(long, default_value_t = climate_runtime::DEFAULT_SWEEP_STEP)]
        step: u32,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the effective model configuration.
    Config,
    /// Send one command line to a running server and print the reply.
    Send {
        #[arg(long, default_value = "127.0.0.1:41001")]
        endpoint: String,
        /// Seconds to wait for the reply.
        #[arg(long, default_value_t = 10)]
        timeout: u64,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Challenge id; unknown ids use the reduce_emissions model.
    #[arg(long, default_value = "reduce_emissions")]
    challenge: String,
    #[arg(long, allow_hyphen_values = true)]
    solar: f64,
    #[arg(long, allow_hyphen_values = true)]
    wind: f64,
    #[arg(long, default_value = "moderate")]
    policy: PolicyStrength,
    #[arg(long)]
    carbon_tax: Option<f64>,
    #[arg(long)]
    reforestation_area: Option<f64>,
}

impl ScenarioArgs {
    fn parameters(&self) -> SimulationParameters {
        let mut parameters = SimulationParameters::new(self.solar, self.wind, self.policy);
        parameters.carbon_tax = self.carbon_tax;
        parameters.reforestation_area = self.reforestation_area;
        parameters
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Run { scenario, insights } => {
            let engine = local_engine();
            let challenge = Challenge::resolve(&scenario.challenge);
            let parameters = scenario.parameters();
            let outcomes = engine.run_challenge(challenge, &parameters);
            let mut report = json!({
                "challenge": challenge,
                "parameters": parameters,
                "outcomes": outcomes,
                "synergyScore": climate_sim::synergy_score(&outcomes),
            });
            if insights {
                report["insights"] =
                    serde_json::to_value(Insights::gather(&parameters, &outcomes, engine.config()))?;
            }
            report
        }
        Command::Explain { scenario } => {
            let engine = local_engine();
            let report = engine.explain(Challenge::resolve(&scenario.challenge), &scenario.parameters());
            serde_json::to_value(report)?
        }
        Command::Sweep {
            challenge,
            policy,
            step,
            limit,
        } => {
            let engine = local_engine();
            let mut request = SweepRequest::new(Challenge::resolve(&challenge), policy, step);
            request.limit = limit;
            let entries = sweep(&engine, &request)?;
            json!({
                "challenge": request.challenge,
                "policy": policy,
                "step": step,
                "entries": entries,
            })
        }
        Command::Config => {
            let (config, metadata) = load_model_config_from_env();
            json!({
                "source": metadata.source_label(),
                "config": serde_json::to_value(config.as_ref())?,
            })
        }
        Command::Send {
            endpoint,
            timeout,
            command,
        } => {
            let line = command.join(" ");
            let response = tokio::time::timeout(
                Duration::from_secs(timeout),
                send_line(&endpoint, &line),
            )
            .await
            .map_err(|_| eyre!("no reply from {endpoint} within {timeout}s"))??;
            serde_json::to_value(response)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn local_engine() -> SimulationEngine {
    let (config, metadata) = load_model_config_from_env();
    debug!(source = %metadata.source_label(), "engine.ready");
    SimulationEngine::new(config)
}

async fn send_line(endpoint: &str, line: &str) -> Result<ResponseEnvelope> {
    let stream = TcpStream::connect(endpoint).await?;
    info!(%endpoint, command = line, "command.sent");
    let (reader, mut writer) = stream.into_split();
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut reply = String::new();
    let read = BufReader::new(reader).read_line(&mut reply).await?;
    if read == 0 {
        return Err(eyre!("server at {endpoint} closed the connection without replying"));
    }
    Ok(ResponseEnvelope::from_line(&reply)?)
}
