use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password, Select};
use medcrew_core::config::{Config, get_config_path};

const BANNER: &str = r"
    -------------------------------------

      medcrew  ·  diagnosis crew setup

    -------------------------------------
";

const PROVIDERS: &[&str] = &["openai", "ollama"];
const OPENAI_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-4o-mini", "gpt-4o"];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your model provider")
        .items(PROVIDERS)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection].to_string())
}

fn setup_api_key(provider: &str, current: &str) -> Result<String> {
    if provider == "ollama" {
        println!("  {} Ollama runs locally, no API key needed", style("✓").green());
        return Ok(String::new());
    }

    let api_key = Password::new()
        .with_prompt("Enter your OpenAI API key")
        .allow_empty_password(!current.is_empty())
        .interact()
        .context("Failed to read API key")?;

    match (api_key.trim(), current) {
        ("", "") => Err(anyhow::anyhow!("API key cannot be empty")),
        ("", current) => Ok(current.to_string()),
        (key, _) => Ok(key.to_string()),
    }
}

fn setup_model(provider: &str, current: &str) -> Result<String> {
    if provider == "ollama" {
        return Input::new()
            .with_prompt("Ollama model name")
            .default("llama3.2".to_string())
            .interact_text()
            .context("Failed to read model name");
    }

    let default = OPENAI_MODELS
        .iter()
        .position(|m| *m == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select your model")
        .items(OPENAI_MODELS)
        .default(default)
        .interact()
        .context("Failed to select model")?;

    Ok(OPENAI_MODELS[selection].to_string())
}

fn setup_search_key(current: &str) -> Result<String> {
    println!(
        "  {}",
        style("Agents use Serper (serper.dev) for web search. Leave empty to skip.").dim()
    );

    let key: String = Input::new()
        .with_prompt("Enter your Serper API key")
        .allow_empty(true)
        .default(current.to_string())
        .show_default(false)
        .interact_text()
        .context("Failed to read Serper API key")?;

    Ok(key.trim().to_string())
}

/// Interactive setup. Existing values are offered as defaults.
pub fn run_onboard(current: Config) -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());
    println!(
        "  {}",
        style("Configure the agents that draft diagnosis and treatment plans.").dim()
    );

    print_step(1, 4, "Provider");
    let provider = setup_provider()?;

    print_step(2, 4, "API Key");
    let api_key = setup_api_key(&provider, &current.api_key)?;

    print_step(3, 4, "Model Selection");
    let model = setup_model(&provider, &current.model)?;

    print_step(4, 4, "Web Search");
    let search_key = setup_search_key(&current.search.api_key)?;

    let mut config = Config {
        provider: Some(provider),
        api_key,
        model,
        ..current
    };
    config.search.api_key = search_key;

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(get_config_path().display()).cyan()
    );
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("medcrew serve").cyan().bold()
    );
    println!();

    Ok(config)
}
