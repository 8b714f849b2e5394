use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Input;
use medcrew_core::report::{DOCX_FILENAME, generate_docx};
use medcrew_core::{Config, DiagnosisService, PatientIntake, config, providers};
use std::path::PathBuf;

mod logging;
mod onboard;
mod web;

#[derive(Parser)]
#[command(name = "medcrew")]
#[command(version, about = "medcrew - AI-powered medical diagnosis and treatment recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Commands {
    /// Configure the model provider and API keys
    Onboard,
    /// Serve the web form
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the diagnosis crew once from the terminal
    Diagnose {
        #[arg(short, long)]
        symptoms: Option<String>,
        #[arg(long = "history")]
        medical_history: Option<String>,
        /// Also write the DOCX report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let mut config = Config::load_or_init()?;

    let command = cli.command.unwrap_or_else(|| {
        default_command(
            config::config_exists(),
            providers::factory::has_api_key(&config),
        )
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard(config).map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            web::serve(&config).await?;
        }
        Commands::Diagnose {
            symptoms,
            medical_history,
            output,
        } => {
            run_diagnose(&config, symptoms, medical_history, output).await?;
        }
    }

    Ok(())
}

/// First runs without a config file or API key go through onboarding;
/// everything else starts the web UI.
fn default_command(config_found: bool, api_key_found: bool) -> Commands {
    if !config_found && !api_key_found {
        Commands::Onboard
    } else {
        Commands::Serve {
            host: None,
            port: None,
        }
    }
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read '{}'", prompt)),
    }
}

async fn run_diagnose(
    config: &Config,
    symptoms: Option<String>,
    medical_history: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let symptoms = prompt_if_missing(symptoms, "Enter Patient Symptoms")?;
    let medical_history = prompt_if_missing(medical_history, "Enter Medical History")?;

    let intake = match PatientIntake::new(&symptoms, &medical_history) {
        Ok(intake) => intake,
        Err(e) => {
            eprintln!("{} {}", style("⚠").yellow(), e);
            anyhow::bail!(e);
        }
    };

    let service = DiagnosisService::from_config(config)?;

    println!("\n🩺 Generating recommendations...\n");
    let plan = match service.run(&intake).await {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("❌ An error occurred: {:#}", e);
            return Err(e);
        }
    };

    let markdown = plan.to_markdown();
    termimad::print_text(&markdown);

    if let Some(path) = output {
        let path = if path.is_dir() {
            path.join(DOCX_FILENAME)
        } else {
            path
        };
        let docx = generate_docx(&markdown)?;
        std::fs::write(&path, docx)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!(
            "\n{} Report saved to {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    Ok(())
}
