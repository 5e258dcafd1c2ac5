//! Tools listing command

use anyhow::Result;
use skillagent_core::ToolRegistry;
use std::io::Write;
use tracing::info;

/// Show available tools
pub async fn tools_command() -> Result<()> {
    info!("Listing available tools");

    let stdout = std::io::stdout();
    write_tools(&ToolRegistry::default(), &mut stdout.lock())
}

/// Write one `name: description` entry per registered tool
pub fn write_tools<W: Write>(registry: &ToolRegistry, out: &mut W) -> Result<()> {
    for name in registry.list_tools() {
        if let Some((tool_name, description)) = registry.get_tool_info(name) {
            // First line only for brevity
            let first_line = description.lines().next().unwrap_or(description);
            writeln!(out, "{}: {}", tool_name, first_line)?;
        }
    }
    Ok(())
}
