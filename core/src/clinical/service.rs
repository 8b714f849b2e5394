use crate::agent::ToolRegistry;
use crate::clinical::roster::{RosterLimits, build_crew};
use crate::clinical::{CarePlan, PatientIntake};
use crate::config::Config;
use crate::providers::create_provider;
use crate::tools::{ScrapeWebsiteTool, WebSearchTool};
use crate::traits::Provider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Turns a patient intake into a care plan by running the clinical crew.
pub struct DiagnosisService {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    limits: RosterLimits,
}

impl DiagnosisService {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tools,
            limits: RosterLimits::default(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.limits.max_iterations = max_iterations;
        self
    }

    /// Wires the configured provider and the research tools. Search is left
    /// out when no Serper key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(config)?;
        let tools = Arc::new(ToolRegistry::new());

        if config.search.api_key.is_empty() {
            warn!("SERPER_API_KEY not set, agents will run without web search");
        } else {
            tools.register(Arc::new(WebSearchTool::new(&config.search)));
        }
        tools.register(Arc::new(ScrapeWebsiteTool::new(&config.scrape)));

        Ok(Self::new(provider, tools).with_max_iterations(config.max_iterations))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn run(&self, intake: &PatientIntake) -> Result<CarePlan> {
        let crew = build_crew(intake, self.provider.clone(), self.tools.clone(), self.limits);
        let output = crew.kickoff().await?;
        info!(crew = %output.id, "Care plan generated");
        Ok(CarePlan::from_crew_output(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;
    use crate::traits::ChatResponse;

    #[tokio::test]
    async fn runs_the_three_agent_crew() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ChatResponse::text("Possible migraine."),
            ChatResponse::text("Hydration and rest."),
            ChatResponse::text("MRI if symptoms persist."),
        ]));
        let service = DiagnosisService::new(provider.clone(), Arc::new(ToolRegistry::new()));
        let intake = PatientIntake::new("throbbing headache", "none").unwrap();

        let plan = service.run(&intake).await.unwrap();
        assert_eq!(plan.diagnosis, "Possible migraine.");
        assert_eq!(plan.treatment, "Hydration and rest.");
        assert_eq!(plan.tests, "MRI if symptoms persist.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].messages[0].content.starts_with("You are Medical Diagnostician."));
        assert!(requests[2].messages[1].content.contains("Hydration and rest."));
    }

    #[tokio::test]
    async fn crew_failure_is_an_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![ChatResponse::text("Flu.")]));
        let service = DiagnosisService::new(provider, Arc::new(ToolRegistry::new()));
        let intake = PatientIntake::new("fever", "none").unwrap();
        assert!(service.run(&intake).await.is_err());
    }

    #[test]
    fn from_config_skips_search_without_key() {
        let config = Config {
            provider: Some("ollama".into()),
            ..Default::default()
        };
        let service = DiagnosisService::from_config(&config).unwrap();
        assert_eq!(service.provider_name(), "ollama");
        assert_eq!(service.tools.names(), vec!["read_website_content".to_string()]);

        let mut config = config;
        config.search.api_key = "serper".into();
        let service = DiagnosisService::from_config(&config).unwrap();
        assert_eq!(service.tools.names().len(), 2);
    }
}
