use anyhow::Result;

use crate::export::runtime::RuntimeConfig;

/// Renders the JS artifact the viewer loads with a plain `<script>` tag.
pub fn render(runtime: &RuntimeConfig) -> Result<String> {
    use serde_json::json;

    let handlebars = crate::common::get_handlebars();

    let res = handlebars.render_template(&get_template(), &json!({ "config": runtime }))?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_js.hbs").to_string()
}
