use crate::traits::{Tool, ToolResult, ToolSpec};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ToolRegistry {
    tools: Mutex<Vec<Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn Tool>>> {
        self.tools.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a tool, replacing any earlier tool with the same name.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.lock();
        tools.retain(|t| t.name() != tool.name());
        tools.push(tool);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|t| t.name().to_string()).collect()
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        self.lock().iter().map(|t| t.spec()).collect()
    }

    pub async fn execute(&self, name: &str, args: serde_json::Value) -> ToolResult {
        let tool = self.lock().iter().find(|t| t.name() == name).cloned();

        match tool {
            Some(tool) => match tool.execute(args).await {
                Ok(result) => result,
                Err(e) => ToolResult::error(format!("Execution failed: {}", e)),
            },
            None => ToolResult::error(format!("Tool '{}' not found", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EchoTool;
    use serde_json::json;

    #[tokio::test]
    async fn executes_registered_tool() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry.execute("echo", json!({"text": "hi"})).await;
        assert!(result.success);
        assert_eq!(result.output, "hi");
    }

    #[tokio::test]
    async fn failures_become_tool_errors() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let missing = registry.execute("nope", json!({})).await;
        assert_eq!(missing.error.as_deref(), Some("Tool 'nope' not found"));

        let failed = registry.execute("echo", json!({})).await;
        assert!(!failed.success);
        assert!(failed.error.unwrap().starts_with("Execution failed"));
    }

    #[test]
    fn duplicate_names_are_replaced() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.names(), vec!["echo".to_string()]);
        assert_eq!(registry.get_specs().len(), 1);
    }
}
