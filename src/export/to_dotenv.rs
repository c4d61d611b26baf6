use std::fmt::Write;

use crate::config::ViewerConfig;
use crate::secrets;

/// Renders a `.env` skeleton documenting the overlay variables. Secret
/// values are never written; non-secret current values appear as comments.
pub fn render(config: &ViewerConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Environment overlay for the rules-graph viewer.");
    let _ = writeln!(
        out,
        "# Copy to .env and fill in the blanks; secrets live here, not in the"
    );
    let _ = writeln!(out, "# configuration document.");
    let _ = writeln!(out);

    let _ = writeln!(out, "# current: {}", config.graph_db.bolt_uri);
    let _ = writeln!(out, "{}=", secrets::DB_URI_VAR);
    if let Some(username) = &config.graph_db.username {
        let _ = writeln!(out, "# current: {}", username);
    }
    let _ = writeln!(out, "{}=", secrets::DB_USERNAME_VAR);
    let _ = writeln!(out, "{}=", secrets::DB_PASSWORD_VAR);
    let _ = writeln!(out);

    if let Some(username) = &config.automation.username {
        let _ = writeln!(out, "# current: {}", username);
    }
    let _ = writeln!(out, "{}=", secrets::AUTOMATION_USERNAME_VAR);
    let _ = writeln!(out, "{}=", secrets::AUTOMATION_PASSWORD_VAR);

    out
}
