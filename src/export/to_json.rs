use anyhow::Result;

use crate::export::runtime::RuntimeConfig;

pub fn render(runtime: &RuntimeConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(runtime)?)
}
