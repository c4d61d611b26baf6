use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// ## Structure
/// This module contains the data structures for the viewer configuration
/// document.
///
/// ```text
/// ViewerConfig
///   ├── meta: Option<Meta>
///   │   └── name: Option<String>
///   ├── graph_db: GraphDbConfig
///   │   ├── bolt_uri: String
///   │   ├── http_path: Option<String>
///   │   ├── username: Option<String>
///   │   ├── password: Option<String>   (read, never written back)
///   │   └── driver: DriverOptions
///   │       ├── encrypted: EncryptionMode
///   │       └── ..extra toggles
///   ├── automation: AutomationConfig
///   │   ├── ingest_webhook: String
///   │   ├── query_webhook: String
///   │   ├── rest_base: String
///   │   ├── username: Option<String>
///   │   └── password: Option<String>   (read, never written back)
///   ├── data_service_url: Option<String>
///   ├── display: DisplayConfig
///   │   ├── labels: map<type, LabelRule>
///   │   ├── relationships: map<type, RelationshipRule>
///   │   └── groups: map<type, GroupStyle>
///   └── emit: EmitConfig
///       └── profiles: Vec<EmitProfile>
///           ├── filename: String
///           ├── format: EmitFileType
///           │   ├── Js
///           │   ├── Json
///           │   └── DotEnv
///           └── redact_secrets: Option<bool>
/// ```

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Meta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub meta: Option<Meta>,
    #[serde(default)]
    pub graph_db: GraphDbConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub data_service_url: Option<String>,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub emit: EmitConfig,
}

//
// Connection configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GraphDbConfig {
    /// Bolt endpoint of the graph database, scheme://host:port
    pub bolt_uri: String,
    /// HTTP-reachable proxy path to the same database
    pub http_path: Option<String>,
    pub username: Option<String>,
    /// Accepted when present in a source document, but only the environment
    /// overlay is expected to set this. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub driver: DriverOptions,
}

impl Default for GraphDbConfig {
    fn default() -> Self {
        Self {
            bolt_uri: "bolt://localhost:7687".to_string(),
            http_path: Some("/neo4j".to_string()),
            username: Some("neo4j".to_string()),
            password: None,
            driver: DriverOptions::default(),
        }
    }
}

/// Transport-level toggles handed to the database driver as-is.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct DriverOptions {
    #[serde(default)]
    pub encrypted: EncryptionMode,
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EncryptionMode {
    #[serde(rename = "ENCRYPTION_ON")]
    On,
    #[default]
    #[serde(rename = "ENCRYPTION_OFF")]
    Off,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AutomationConfig {
    /// Webhook path for pushing rule documents into the graph
    pub ingest_webhook: String,
    /// Webhook path for querying the graph through the automation service
    pub query_webhook: String,
    /// Root path of the automation service REST API
    pub rest_base: String,
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            ingest_webhook: "/n8n/webhook/dg/rules-ingest".to_string(),
            query_webhook: "/n8n/webhook/dg/graph-query".to_string(),
            rest_base: "/n8n/rest".to_string(),
            username: None,
            password: None,
        }
    }
}

//
// Display configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct DisplayConfig {
    /// Which attribute to show as the on-screen label, per node type
    #[serde(default)]
    pub labels: IndexMap<String, LabelRule>,
    /// How to render each edge type
    #[serde(default)]
    pub relationships: IndexMap<String, RelationshipRule>,
    /// Node styling, per node type
    #[serde(default)]
    pub groups: IndexMap<String, GroupStyle>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LabelRule {
    /// Name of the node attribute rendered as the visible caption
    pub caption: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct RelationshipRule {
    pub caption: Option<bool>,
    pub thickness: Option<f64>,
}

/// Concrete edge styling after defaults are applied.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RelationshipStyle {
    pub caption: bool,
    pub thickness: f64,
}

impl RelationshipRule {
    pub fn resolve(&self) -> RelationshipStyle {
        let caption = self.caption.unwrap_or(true);
        let thickness = self.thickness.unwrap_or(2.0);

        RelationshipStyle { caption, thickness }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GroupStyle {
    /// Fill color, #rrggbb
    pub background: String,
    /// Outline color, #rrggbb
    pub border: String,
}

//
// Emit configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EmitConfig {
    pub profiles: Vec<EmitProfile>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EmitProfile {
    pub filename: String,
    pub format: EmitFileType,
    pub redact_secrets: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitFileType {
    Js,
    Json,
    DotEnv,
}

impl EmitProfile {
    pub fn redact_secrets(&self) -> bool {
        self.redact_secrets.unwrap_or(false)
    }
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            profiles: vec![
                EmitProfile {
                    filename: "public/config.js".to_string(),
                    format: EmitFileType::Js,
                    redact_secrets: None,
                },
                EmitProfile {
                    filename: "public/config.json".to_string(),
                    format: EmitFileType::Json,
                    redact_secrets: None,
                },
                EmitProfile {
                    filename: ".env.sample".to_string(),
                    format: EmitFileType::DotEnv,
                    redact_secrets: None,
                },
            ],
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let mut labels = IndexMap::new();
        for (node_type, attribute) in [
            ("Rule", "id"),
            ("Atom", "id"),
            ("Class", "name"),
            ("DataProperty", "name"),
            ("ObjectProperty", "name"),
            ("Builtin", "name"),
        ] {
            labels.insert(
                node_type.to_string(),
                LabelRule {
                    caption: attribute.to_string(),
                },
            );
        }

        let mut relationships = IndexMap::new();
        for rel_type in [
            "HAS_ATOM",
            "REFERS_TO",
            "HAS_DATA_PROPERTY",
            "HAS_OBJECT_PROPERTY",
        ] {
            relationships.insert(
                rel_type.to_string(),
                RelationshipRule {
                    caption: Some(true),
                    thickness: Some(2.0),
                },
            );
        }

        let mut groups = IndexMap::new();
        for (node_type, background, border) in [
            ("Rule", "#6da7ff", "#3f7ed9"),
            ("Atom", "#b7c0cc", "#8c96a3"),
            ("Class", "#78c38a", "#5aa46c"),
            ("DataProperty", "#ffb36b", "#e5923a"),
            ("ObjectProperty", "#ff8f3a", "#d86d1f"),
            ("Builtin", "#9aa4b2", "#6f7884"),
        ] {
            groups.insert(
                node_type.to_string(),
                GroupStyle {
                    background: background.to_string(),
                    border: border.to_string(),
                },
            );
        }

        Self {
            meta: Some(Meta {
                name: Some("rules-graph".to_string()),
            }),
            graph_db: GraphDbConfig::default(),
            automation: AutomationConfig::default(),
            data_service_url: Some("/data-service".to_string()),
            display: DisplayConfig {
                labels,
                relationships,
                groups,
            },
            emit: EmitConfig::default(),
        }
    }
}

//
// Process-wide handle
//

static INSTALLED: OnceCell<ViewerConfig> = OnceCell::new();

impl ViewerConfig {
    /// Installs this configuration as the process-wide instance and returns
    /// a reference to it. The first installation wins; later calls return
    /// the already-installed configuration unchanged. There is no mutation
    /// API once installed.
    pub fn install(self) -> &'static ViewerConfig {
        INSTALLED.get_or_init(|| self)
    }

    /// Returns the installed configuration, if any.
    pub fn installed() -> Option<&'static ViewerConfig> {
        INSTALLED.get()
    }
}
