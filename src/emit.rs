use std::path::Path;
use std::sync::mpsc::channel;

use anyhow::{anyhow, Result};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::config::{EmitFileType, EmitProfile, ViewerConfig};
use crate::export;
use crate::secrets;
use crate::validate;

/// Loads a configuration document from disk, dispatching on file extension.
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("");

    let content = std::fs::read_to_string(path)?;
    let config = match extension {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        _ => {
            error!("Error: unsupported extension {}", extension);
            anyhow::bail!("Unsupported extension");
        }
    };
    Ok(config)
}

/// Loads, overlays and validates a document in one step.
pub fn load_checked(path: &Path) -> Result<ViewerConfig> {
    let mut config = load_config(path)?;
    secrets::apply_env(&mut config);

    if let Err(errors) = validate::validate(&config) {
        warn!("Identified {} configuration error(s)", errors.len());
        errors.iter().for_each(|e| warn!("{}", e));
        anyhow::bail!("Configuration did not validate");
    }

    Ok(config)
}

/// Renders one emit profile to a string.
fn render_profile(config: &ViewerConfig, profile: &EmitProfile) -> Result<String> {
    let runtime = export::runtime::RuntimeConfig::from_viewer(config, profile.redact_secrets());

    match profile.format {
        EmitFileType::Js => export::to_js::render(&runtime),
        EmitFileType::Json => export::to_json::render(&runtime),
        EmitFileType::DotEnv => Ok(export::to_dotenv::render(config)),
    }
}

/// Renders every emit profile and writes the artifacts next to the
/// configuration file.
fn run_emit(config: &ViewerConfig, config_file_path: &Path) -> Result<()> {
    let base_dir = config_file_path
        .parent()
        .ok_or_else(|| anyhow!("Configuration file has no parent directory"))?;

    for profile in &config.emit.profiles {
        info!(
            "Emitting file: {} as {:?}",
            profile.filename, profile.format
        );

        let output = match render_profile(config, profile) {
            Ok(output) => output,
            Err(e) => {
                error!("Failed to render {}: {}", profile.filename, e);
                continue;
            }
        };

        let target = base_dir.join(&profile.filename);
        let target = target
            .to_str()
            .ok_or_else(|| anyhow!("Emit path contains invalid UTF-8"))?;
        if let Err(e) = crate::common::write_string_to_file(target, &output) {
            error!("Failed to write to file {}: {}", target, e);
        }
    }

    Ok(())
}

/// Main entry point: publish the runtime artifacts, optionally re-running
/// whenever the source document changes.
pub fn execute_emit(config_path: String, watch: bool) -> Result<()> {
    info!("Publishing viewer configuration {}", config_path);

    let config_file_path = Path::new(&config_path);
    let config = load_checked(config_file_path)?;

    debug!("Loaded configuration: {:?}", config);
    run_emit(&config, config_file_path)?;

    if watch {
        watch_for_changes(config_file_path)?;
    }

    Ok(())
}

/// Re-runs the pipeline whenever the source document is modified.
fn watch_for_changes(config_file_path: &Path) -> Result<()> {
    info!("Watching for changes");

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    watcher.watch(config_file_path, RecursiveMode::NonRecursive)?;

    loop {
        match rx.recv() {
            Ok(event) => {
                if let Ok(event) = event {
                    if let EventKind::Modify(_) = event.kind {
                        debug!("File modified {:?}", event.paths);
                        info!("Change detected, re-publishing");
                        match load_checked(config_file_path) {
                            Ok(config) => run_emit(&config, config_file_path)?,
                            Err(e) => error!("Not publishing: {}", e),
                        }
                    }
                }
            }
            Err(e) => error!("Watch error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_yaml_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = write_temp(
            &dir,
            "viewer.yaml",
            "graph_db:\n  bolt_uri: bolt://a:7687\n  http_path: /neo4j\n",
        );
        let config = load_config(&yaml).unwrap();
        assert_eq!(config.graph_db.bolt_uri, "bolt://a:7687");

        let json = write_temp(
            &dir,
            "viewer.json",
            r#"{"graph_db": {"bolt_uri": "bolt://b:7687", "http_path": "/neo4j"}}"#,
        );
        let config = load_config(&json).unwrap();
        assert_eq!(config.graph_db.bolt_uri, "bolt://b:7687");

        let toml = write_temp(
            &dir,
            "viewer.toml",
            "[graph_db]\nbolt_uri = \"bolt://c:7687\"\nhttp_path = \"/neo4j\"\n",
        );
        let config = load_config(&toml).unwrap();
        assert_eq!(config.graph_db.bolt_uri, "bolt://c:7687");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "viewer.ini", "[graph_db]\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn emit_writes_artifacts_next_to_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ViewerConfig::default();
        config.graph_db.password = Some("secret-a".to_string());
        config.automation.username = Some("ops@example.org".to_string());
        config.automation.password = Some("secret-b".to_string());

        let document = dir.path().join("viewer.yaml");
        run_emit(&config, &document).unwrap();

        let js = std::fs::read_to_string(dir.path().join("public/config.js")).unwrap();
        assert!(js.starts_with("window.GRAPH_CONFIG ="));

        let json = std::fs::read_to_string(dir.path().join("public/config.json")).unwrap();
        assert!(json.contains("\"neo4jUri\""));

        let dotenv = std::fs::read_to_string(dir.path().join(".env.sample")).unwrap();
        assert!(dotenv.contains("GRAPHCONF_DB_PASSWORD"));
        assert!(!dotenv.contains("secret-a"));
    }
}
