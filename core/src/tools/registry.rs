//! Tool registry for managing available tools

use crate::error::{Result, ToolError};
use crate::tools::{Tool, ToolExecutor};
use std::collections::BTreeMap;

/// Registry for managing tool creation and registration
pub struct ToolRegistry {
    factories: BTreeMap<String, Box<dyn ToolFactory>>,
}

/// Factory trait for creating tools
pub trait ToolFactory: Send + Sync {
    /// Create a new instance of the tool
    fn create(&self) -> Box<dyn Tool>;

    /// Get the name of the tool this factory creates
    fn tool_name(&self) -> &str;

    /// Get the description of the tool this factory creates
    fn tool_description(&self) -> &str;
}

impl ToolRegistry {
    /// Create an empty tool registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a tool factory, replacing any factory with the same name
    pub fn register_factory(&mut self, factory: Box<dyn ToolFactory>) {
        self.factories
            .insert(factory.tool_name().to_string(), factory);
    }

    /// Create a tool by name
    pub fn create_tool(&self, name: &str) -> Option<Box<dyn Tool>> {
        self.factories.get(name).map(|factory| factory.create())
    }

    /// List all available tool names
    pub fn list_tools(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Get tool information
    pub fn get_tool_info(&self, name: &str) -> Option<(&str, &str)> {
        self.factories
            .get(name)
            .map(|factory| (factory.tool_name(), factory.tool_description()))
    }

    /// Create a tool executor with the named tools, in the order given
    pub fn create_executor(&self, tool_names: &[String]) -> Result<ToolExecutor> {
        let mut executor = ToolExecutor::new();

        for name in tool_names {
            let tool = self
                .create_tool(name)
                .ok_or_else(|| ToolError::NotFound { name: name.clone() })?;
            executor.register_tool(tool)?;
        }

        Ok(executor)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        registry.register_factory(Box::new(crate::tools::builtin::EchoToolFactory));

        registry
    }
}

/// Tool names an agent gets when none are configured
pub fn default_tools() -> Vec<String> {
    vec![crate::tools::builtin::ECHO_TOOL_NAME.to_string()]
}

/// Macro to help implement tool factories
#[macro_export]
macro_rules! impl_tool_factory {
    ($factory:ident, $tool:ident, $name:expr, $description:expr) => {
        pub struct $factory;

        impl $crate::tools::ToolFactory for $factory {
            fn create(&self) -> Box<dyn $crate::tools::Tool> {
                Box::new($tool::new())
            }

            fn tool_name(&self) -> &str {
                $name
            }

            fn tool_description(&self) -> &str {
                $description
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_only_echo() {
        let registry = ToolRegistry::default();
        assert_eq!(registry.list_tools(), vec!["EchoTool"]);
    }

    #[test]
    fn test_default_tool_list_is_single_echo_entry() {
        let registry = ToolRegistry::default();
        let executor = registry.create_executor(&default_tools()).unwrap();

        let tools: Vec<_> = executor.tools().collect();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "EchoTool");
        assert_eq!(tools[0].description(), "Echoes the input text.");
    }

    #[test]
    fn test_tool_info_matches_created_tool() {
        let registry = ToolRegistry::default();

        for tool_name in registry.list_tools() {
            let (name, description) = registry.get_tool_info(tool_name).unwrap();
            let tool = registry.create_tool(tool_name).unwrap();
            assert_eq!(name, tool.name());
            assert_eq!(description, tool.description());
        }
    }

    #[test]
    fn test_create_executor_with_unknown_tool_fails() {
        let registry = ToolRegistry::default();
        let err = registry
            .create_executor(&["Calculator".to_string()])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::NotFound { .. })
        ));
    }

    #[test]
    fn test_create_executor_rejects_repeated_names() {
        let registry = ToolRegistry::default();
        let names = vec!["EchoTool".to_string(), "EchoTool".to_string()];
        assert!(registry.create_executor(&names).is_err());
    }
}
