use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{RelationshipStyle, ViewerConfig};

/// The document shape the browser viewer actually loads. Key names are the
/// viewer's contract and must not change independently of it.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub neo4j_uri: String,
    pub neo4j_http: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub n8n_webhook: String,
    pub n8n_query_webhook: String,
    pub data_service_url: String,
    pub n8n_rest_base: String,
    pub n8n_user: String,
    pub n8n_password: String,
    pub driver_config: IndexMap<String, String>,
    pub labels: IndexMap<String, RuntimeLabel>,
    pub relationships: IndexMap<String, RelationshipStyle>,
    pub vis_groups: IndexMap<String, RuntimeGroup>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RuntimeLabel {
    pub label: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RuntimeGroup {
    pub color: RuntimeGroupColor,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RuntimeGroupColor {
    pub background: String,
    pub border: String,
}

impl RuntimeConfig {
    /// Builds the runtime document from a validated source document,
    /// resolving display-rule defaults. With `redact_secrets`, credential
    /// fields are blanked so the artifact can be committed or shared.
    pub fn from_viewer(config: &ViewerConfig, redact_secrets: bool) -> Self {
        let secret = |value: &Option<String>| {
            if redact_secrets {
                String::new()
            } else {
                value.clone().unwrap_or_default()
            }
        };

        let mut driver_config = IndexMap::new();
        driver_config.insert(
            "encrypted".to_string(),
            match config.graph_db.driver.encrypted {
                crate::config::EncryptionMode::On => "ENCRYPTION_ON".to_string(),
                crate::config::EncryptionMode::Off => "ENCRYPTION_OFF".to_string(),
            },
        );
        for (key, value) in &config.graph_db.driver.extra {
            driver_config.insert(key.clone(), value.clone());
        }

        let labels = config
            .display
            .labels
            .iter()
            .map(|(type_name, rule)| {
                (
                    type_name.clone(),
                    RuntimeLabel {
                        label: rule.caption.clone(),
                    },
                )
            })
            .collect();

        let relationships = config
            .display
            .relationships
            .iter()
            .map(|(rel_type, rule)| (rel_type.clone(), rule.resolve()))
            .collect();

        let vis_groups = config
            .display
            .groups
            .iter()
            .map(|(type_name, group)| {
                (
                    type_name.clone(),
                    RuntimeGroup {
                        color: RuntimeGroupColor {
                            background: group.background.clone(),
                            border: group.border.clone(),
                        },
                    },
                )
            })
            .collect();

        Self {
            neo4j_uri: config.graph_db.bolt_uri.clone(),
            neo4j_http: config.graph_db.http_path.clone().unwrap_or_default(),
            neo4j_user: config.graph_db.username.clone().unwrap_or_default(),
            neo4j_password: secret(&config.graph_db.password),
            n8n_webhook: config.automation.ingest_webhook.clone(),
            n8n_query_webhook: config.automation.query_webhook.clone(),
            data_service_url: config.data_service_url.clone().unwrap_or_default(),
            n8n_rest_base: config.automation.rest_base.clone(),
            n8n_user: config.automation.username.clone().unwrap_or_default(),
            n8n_password: secret(&config.automation.password),
            driver_config,
            labels,
            relationships,
            vis_groups,
        }
    }
}
