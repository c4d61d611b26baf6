use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::config::ViewerConfig;
use crate::secrets;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid")
});

const BOLT_SCHEMES: &[&str] = &["bolt", "neo4j", "bolt+s", "neo4j+s"];

/// Credential values that only ever appear in throwaway local setups.
/// Publishing a runtime artifact with one of these is always a mistake.
const PLACEHOLDER_SECRETS: &[&str] = &["12345678", "password", "changeme", "neo4j", "admin"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid graph endpoint '{uri}': {reason}")]
    InvalidEndpoint { uri: String, reason: String },
    #[error("'{path}' is not an absolute path or URL ({field})")]
    InvalidPath { field: &'static str, path: String },
    #[error("{service} password looks like a placeholder; set {env_var} to a real secret")]
    PlaceholderCredential {
        service: &'static str,
        env_var: &'static str,
    },
    #[error("{service} has no credentials; set {env_var}")]
    MissingCredential {
        service: &'static str,
        env_var: &'static str,
    },
    #[error("display type '{0}' has a color group but no label rule")]
    GroupWithoutLabel(String),
    #[error("display type '{0}' has a label rule but no color group")]
    LabelWithoutGroup(String),
    #[error("display type '{type_name}': '{color}' is not a #rrggbb color")]
    InvalidColor { type_name: String, color: String },
    #[error("relationship '{0}': thickness must be greater than zero")]
    NonPositiveThickness(String),
    #[error("emit profile {0} has an empty filename")]
    EmptyEmitFilename(usize),
}

/// Checks a loaded document after the environment overlay has been applied.
/// Reports every problem found rather than stopping at the first.
pub fn validate(config: &ViewerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_graph_db(config, &mut errors);
    check_automation(config, &mut errors);
    check_display(config, &mut errors);
    check_emit(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_graph_db(config: &ViewerConfig, errors: &mut Vec<ConfigError>) {
    let db = &config.graph_db;

    if db.bolt_uri.is_empty() {
        errors.push(ConfigError::MissingField("graph_db.bolt_uri"));
    } else {
        match Url::parse(&db.bolt_uri) {
            Ok(url) if BOLT_SCHEMES.contains(&url.scheme()) => {}
            Ok(url) => errors.push(ConfigError::InvalidEndpoint {
                uri: db.bolt_uri.clone(),
                reason: format!(
                    "scheme '{}' is not one of {}",
                    url.scheme(),
                    BOLT_SCHEMES.join(", ")
                ),
            }),
            Err(e) => errors.push(ConfigError::InvalidEndpoint {
                uri: db.bolt_uri.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if let Some(http_path) = &db.http_path {
        check_path("graph_db.http_path", http_path, errors);
    }

    check_credentials(
        "graph database",
        db.username.as_deref(),
        db.password.as_deref(),
        secrets::DB_USERNAME_VAR,
        secrets::DB_PASSWORD_VAR,
        errors,
    );
}

fn check_automation(config: &ViewerConfig, errors: &mut Vec<ConfigError>) {
    let automation = &config.automation;

    if automation.ingest_webhook.is_empty() {
        errors.push(ConfigError::MissingField("automation.ingest_webhook"));
    } else {
        check_path(
            "automation.ingest_webhook",
            &automation.ingest_webhook,
            errors,
        );
    }

    if automation.query_webhook.is_empty() {
        errors.push(ConfigError::MissingField("automation.query_webhook"));
    } else {
        check_path("automation.query_webhook", &automation.query_webhook, errors);
    }

    if automation.rest_base.is_empty() {
        errors.push(ConfigError::MissingField("automation.rest_base"));
    } else {
        check_path("automation.rest_base", &automation.rest_base, errors);
    }

    if let Some(data_service_url) = &config.data_service_url {
        check_path("data_service_url", data_service_url, errors);
    }

    check_credentials(
        "automation service",
        automation.username.as_deref(),
        automation.password.as_deref(),
        secrets::AUTOMATION_USERNAME_VAR,
        secrets::AUTOMATION_PASSWORD_VAR,
        errors,
    );
}

fn check_credentials(
    service: &'static str,
    username: Option<&str>,
    password: Option<&str>,
    username_var: &'static str,
    password_var: &'static str,
    errors: &mut Vec<ConfigError>,
) {
    match password {
        None | Some("") => errors.push(ConfigError::MissingCredential {
            service,
            env_var: password_var,
        }),
        Some(password) if PLACEHOLDER_SECRETS.contains(&password) => {
            errors.push(ConfigError::PlaceholderCredential {
                service,
                env_var: password_var,
            })
        }
        Some(_) => {}
    }

    if username.map_or(true, str::is_empty) {
        errors.push(ConfigError::MissingCredential {
            service,
            env_var: username_var,
        });
    }
}

fn check_path(field: &'static str, path: &str, errors: &mut Vec<ConfigError>) {
    let is_absolute_path = path.starts_with('/');
    let is_url = Url::parse(path).is_ok();
    if !is_absolute_path && !is_url {
        errors.push(ConfigError::InvalidPath {
            field,
            path: path.to_string(),
        });
    }
}

fn check_display(config: &ViewerConfig, errors: &mut Vec<ConfigError>) {
    let display = &config.display;

    // Every styled type must be labelable and vice versa. Catching a type
    // renamed in one map but not the other is the point of this check.
    for type_name in display.groups.keys() {
        if !display.labels.contains_key(type_name) {
            errors.push(ConfigError::GroupWithoutLabel(type_name.clone()));
        }
    }
    for type_name in display.labels.keys() {
        if !display.groups.contains_key(type_name) {
            errors.push(ConfigError::LabelWithoutGroup(type_name.clone()));
        }
    }

    for (type_name, group) in &display.groups {
        for color in [&group.background, &group.border] {
            if !HEX_COLOR.is_match(color) {
                errors.push(ConfigError::InvalidColor {
                    type_name: type_name.clone(),
                    color: color.clone(),
                });
            }
        }
    }

    for (rel_type, rule) in &display.relationships {
        if let Some(thickness) = rule.thickness {
            if thickness <= 0.0 {
                errors.push(ConfigError::NonPositiveThickness(rel_type.clone()));
            }
        }
    }
}

fn check_emit(config: &ViewerConfig, errors: &mut Vec<ConfigError>) {
    for (idx, profile) in config.emit.profiles.iter().enumerate() {
        if profile.filename.is_empty() {
            errors.push(ConfigError::EmptyEmitFilename(idx));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GroupStyle, RelationshipRule};

    fn valid_config() -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.graph_db.password = Some("a-real-secret".to_string());
        config.automation.username = Some("ops@example.org".to_string());
        config.automation.password = Some("another-real-secret".to_string());
        config
    }

    #[test]
    fn default_document_with_overlay_passes() {
        assert_eq!(validate(&valid_config()), Ok(()));
    }

    #[test]
    fn missing_bolt_uri_is_reported() {
        let mut config = valid_config();
        config.graph_db.bolt_uri = String::new();
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::MissingField("graph_db.bolt_uri")));
    }

    #[test]
    fn http_scheme_is_rejected_for_bolt_endpoint() {
        let mut config = valid_config();
        config.graph_db.bolt_uri = "http://localhost:7474".to_string();
        let errors = validate(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn placeholder_password_is_rejected() {
        let mut config = valid_config();
        config.graph_db.password = Some("12345678".to_string());
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::PlaceholderCredential {
            service: "graph database",
            env_var: secrets::DB_PASSWORD_VAR,
        }));
    }

    #[test]
    fn missing_password_is_rejected() {
        let mut config = valid_config();
        config.automation.password = None;
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::MissingCredential {
            service: "automation service",
            env_var: secrets::AUTOMATION_PASSWORD_VAR,
        }));
    }

    #[test]
    fn group_without_label_is_reported_both_ways() {
        let mut config = valid_config();
        config.display.groups.insert(
            "Orphan".to_string(),
            GroupStyle {
                background: "#123456".to_string(),
                border: "#654321".to_string(),
            },
        );
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::GroupWithoutLabel("Orphan".to_string())));

        let mut config = valid_config();
        config.display.groups.shift_remove("Builtin");
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::LabelWithoutGroup("Builtin".to_string())));
    }

    #[test]
    fn malformed_color_is_reported() {
        let mut config = valid_config();
        config.display.groups["Class"].background = "teal".to_string();
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::InvalidColor {
            type_name: "Class".to_string(),
            color: "teal".to_string(),
        }));
    }

    #[test]
    fn non_positive_thickness_is_reported() {
        let mut config = valid_config();
        config.display.relationships.insert(
            "HAS_ATOM".to_string(),
            RelationshipRule {
                caption: None,
                thickness: Some(0.0),
            },
        );
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::NonPositiveThickness("HAS_ATOM".to_string())));
    }

    #[test]
    fn relative_webhook_path_is_rejected() {
        let mut config = valid_config();
        config.automation.ingest_webhook = "webhook/rules-ingest".to_string();
        let errors = validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigError::InvalidPath {
            field: "automation.ingest_webhook",
            path: "webhook/rules-ingest".to_string(),
        }));
    }
}
