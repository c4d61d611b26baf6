//! Environment overlay for credentials and endpoint overrides.
//!
//! Source documents carry no secrets; the variables below supply them at
//! run time, before validation. File values lose to environment values.

use tracing::debug;

use crate::config::ViewerConfig;

pub const DB_URI_VAR: &str = "GRAPHCONF_DB_URI";
pub const DB_USERNAME_VAR: &str = "GRAPHCONF_DB_USERNAME";
pub const DB_PASSWORD_VAR: &str = "GRAPHCONF_DB_PASSWORD";
pub const AUTOMATION_USERNAME_VAR: &str = "GRAPHCONF_AUTOMATION_USERNAME";
pub const AUTOMATION_PASSWORD_VAR: &str = "GRAPHCONF_AUTOMATION_PASSWORD";

/// All variables the overlay reads, in the order the dotenv emitter
/// documents them.
pub const OVERLAY_VARS: &[&str] = &[
    DB_URI_VAR,
    DB_USERNAME_VAR,
    DB_PASSWORD_VAR,
    AUTOMATION_USERNAME_VAR,
    AUTOMATION_PASSWORD_VAR,
];

/// Applies the environment overlay to a freshly loaded document.
pub fn apply_env(config: &mut ViewerConfig) {
    apply_from(config, |var| std::env::var(var).ok());
}

/// Overlay with an injectable variable source, so tests do not have to
/// mutate process-wide environment state.
pub fn apply_from<F>(config: &mut ViewerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup(DB_URI_VAR) {
        debug!("Overriding graph_db.bolt_uri from {}", DB_URI_VAR);
        config.graph_db.bolt_uri = uri;
    }
    if let Some(username) = lookup(DB_USERNAME_VAR) {
        config.graph_db.username = Some(username);
    }
    if let Some(password) = lookup(DB_PASSWORD_VAR) {
        config.graph_db.password = Some(password);
    }
    if let Some(username) = lookup(AUTOMATION_USERNAME_VAR) {
        config.automation.username = Some(username);
    }
    if let Some(password) = lookup(AUTOMATION_PASSWORD_VAR) {
        config.automation.password = Some(password);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_fixture(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn overlay_fills_missing_credentials() {
        let mut config = ViewerConfig::default();
        assert!(config.graph_db.password.is_none());

        let env = env_fixture(&[
            (DB_PASSWORD_VAR, "s3cret"),
            (AUTOMATION_USERNAME_VAR, "ops@example.org"),
            (AUTOMATION_PASSWORD_VAR, "other-s3cret"),
        ]);
        apply_from(&mut config, |var| env.get(var).cloned());

        assert_eq!(config.graph_db.password.as_deref(), Some("s3cret"));
        assert_eq!(
            config.automation.username.as_deref(),
            Some("ops@example.org")
        );
        assert_eq!(
            config.automation.password.as_deref(),
            Some("other-s3cret")
        );
    }

    #[test]
    fn overlay_wins_over_file_values() {
        let mut config = ViewerConfig::default();
        config.graph_db.bolt_uri = "bolt://localhost:7687".to_string();
        config.graph_db.username = Some("neo4j".to_string());

        let env = env_fixture(&[
            (DB_URI_VAR, "bolt+s://graph.internal:7687"),
            (DB_USERNAME_VAR, "viewer"),
        ]);
        apply_from(&mut config, |var| env.get(var).cloned());

        assert_eq!(config.graph_db.bolt_uri, "bolt+s://graph.internal:7687");
        assert_eq!(config.graph_db.username.as_deref(), Some("viewer"));
    }

    #[test]
    fn overlay_is_a_no_op_without_variables() {
        let mut config = ViewerConfig::default();
        let before = config.clone();
        apply_from(&mut config, |_| None);
        assert_eq!(config, before);
    }
}
