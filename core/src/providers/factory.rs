use crate::config::Config;
use crate::providers::{OllamaProvider, OpenAIProvider};
use crate::traits::Provider;
use anyhow::{Result, anyhow};
use std::sync::Arc;

const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "MEDCREW_OPENAI_API_KEY"];

pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    create_provider_with_env(config, |key| std::env::var(key).ok())
}

pub fn create_provider_with_env<F>(config: &Config, lookup: F) -> Result<Arc<dyn Provider>>
where
    F: Fn(&str) -> Option<String>,
{
    let provider_name = config.provider.as_deref().unwrap_or("openai");

    match provider_name.to_lowercase().as_str() {
        "ollama" => {
            let mut provider = OllamaProvider::new()
                .with_model(config.model.clone())
                .with_temperature(config.temperature);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        "openai" => {
            let api_key = resolve_api_key(OPENAI_KEY_VARS, &config.api_key, lookup)?;
            let mut provider = OpenAIProvider::new(api_key)
                .with_model(config.model.clone())
                .with_temperature(config.temperature);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        _ => Err(anyhow!(
            "Unknown provider: {}. Available: openai, ollama",
            provider_name
        )),
    }
}

/// Environment wins over the config file so `.env` files behave as expected.
pub fn resolve_api_key<F>(env_vars: &[&str], config_key: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    env_vars
        .iter()
        .filter_map(|var| lookup(var))
        .find(|key| !key.trim().is_empty())
        .or_else(|| (!config_key.is_empty()).then(|| config_key.to_string()))
        .ok_or_else(|| {
            anyhow!(
                "No API key found. Set {} or run 'medcrew onboard'",
                env_vars.join(" or ")
            )
        })
}

pub fn has_api_key(config: &Config) -> bool {
    matches!(config.provider.as_deref(), Some(p) if p.eq_ignore_ascii_case("ollama"))
        || resolve_api_key(OPENAI_KEY_VARS, &config.api_key, |key| std::env::var(key).ok())
            .is_ok()
}
