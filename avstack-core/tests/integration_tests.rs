// SPDX-License-Identifier: Apache-2.0

//! End-to-end integration tests for avstack-core.
//!
//! These tests verify the flow from configuration on disk through preflight
//! checks to the health report, with the orchestrator and network faked.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use avstack_core::{
    Clock, ConfigLoader, Deployment, DictionaryDir, HealthProbe, Orchestrator, ProbeOutcome,
    StackConfig, StackError, StackResult, PLACEHOLDER_FILE,
};

/// Orchestrator fake recording every invocation in order.
#[derive(Default)]
struct RecordingOrchestrator {
    ops: Mutex<Vec<String>>,
}

impl RecordingOrchestrator {
    fn recorded(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    fn record(&self, op: &str) {
        self.ops.lock().unwrap().push(op.to_string());
    }
}

impl Orchestrator for RecordingOrchestrator {
    fn ping(&self) -> StackResult<()> {
        self.record("ping");
        Ok(())
    }
    fn build(&self, env_file: &Path) -> StackResult<()> {
        self.record(&format!("build {}", env_file.display()));
        Ok(())
    }
    fn up(&self, env_file: &Path) -> StackResult<()> {
        self.record(&format!("up {}", env_file.display()));
        Ok(())
    }
    fn down(&self) -> StackResult<()> {
        self.record("down");
        Ok(())
    }
    fn processes(&self) -> StackResult<String> {
        self.record("ps");
        Ok("NAME  STATE\napi   Up\nui    Up\n".to_string())
    }
    fn follow_logs(&self) -> StackResult<()> {
        self.record("logs");
        Ok(())
    }
}

/// Probe fake answering from a fixed URL table.
struct ScriptedProbe {
    responses: HashMap<String, ProbeOutcome>,
}

impl ScriptedProbe {
    fn new(responses: &[(&str, bool, &str)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(url, reachable, body)| {
                    (
                        url.to_string(),
                        ProbeOutcome {
                            reachable: *reachable,
                            body: body.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl HealthProbe for ScriptedProbe {
    async fn get(&self, url: &str) -> ProbeOutcome {
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(ProbeOutcome::unreachable)
    }
}

/// Clock fake that records instead of waiting.
#[derive(Default)]
struct InstantClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl Clock for InstantClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn config_in(project: &TempDir) -> StackConfig {
    let mut config = StackConfig::default();
    config.options.project_dir = project.path().to_path_buf();
    config
}

/// Full happy path: env file present, dictionaries populated, both
/// endpoints healthy.
#[tokio::test]
async fn test_start_flow_happy_path() {
    let project = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(project.path().join(".env"), "USPS_CLIENT_ID=x\n").unwrap();
    let dict = project.path().join("dictionaries");
    std::fs::create_dir(&dict).unwrap();
    std::fs::write(dict.join("suffixes.csv"), "ST,STREET\n").unwrap();

    let probe = ScriptedProbe::new(&[
        (
            "http://localhost:8000/health",
            true,
            r#"{"status": "healthy", "dictionary_loaded": true}"#,
        ),
        ("http://localhost:8501/_stcore/health", true, "ok"),
    ]);
    let deployment = Deployment::new(
        config_in(&project),
        RecordingOrchestrator::default(),
        probe,
        InstantClock::default(),
    );

    deployment.ensure_runtime().unwrap();
    let env_file = deployment.resolve_env_file().unwrap();
    assert_eq!(env_file, project.path().join(".env"));

    let dictionary = deployment.ensure_dictionary_dir().unwrap();
    assert_eq!(dictionary, DictionaryDir::Populated { files: 1 });

    deployment.build(&env_file).unwrap();
    deployment.up(&env_file).unwrap();
    deployment.settle().await;

    let report = deployment.check_health().await;
    assert!(report.all_healthy());
    assert_eq!(report.endpoints[0].dictionary_loaded(), Some(true));
}

/// Missing env files abort before the orchestrator builds anything.
#[tokio::test]
async fn test_missing_env_file_aborts_before_build() {
    let project = TempDir::new().expect("Failed to create temp dir");

    let deployment = Deployment::new(
        config_in(&project),
        RecordingOrchestrator::default(),
        ScriptedProbe::new(&[]),
        InstantClock::default(),
    );

    deployment.ensure_runtime().unwrap();
    let result = deployment.resolve_env_file();
    assert!(matches!(result, Err(StackError::EnvFileMissing { .. })));
}

/// An absent dictionary directory is self-healed, not fatal.
#[tokio::test]
async fn test_degraded_mode_self_heals_dictionary_dir() {
    let project = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(project.path().join(".env.local"), "USPS_CLIENT_ID=x\n").unwrap();

    let deployment = Deployment::new(
        config_in(&project),
        RecordingOrchestrator::default(),
        ScriptedProbe::new(&[]),
        InstantClock::default(),
    );

    // Fallback env file is picked up since the primary is absent.
    let env_file = deployment.resolve_env_file().unwrap();
    assert_eq!(env_file, project.path().join(".env.local"));

    let dictionary = deployment.ensure_dictionary_dir().unwrap();
    assert_eq!(dictionary, DictionaryDir::Placeholder);
    assert!(project
        .path()
        .join("dictionaries")
        .join(PLACEHOLDER_FILE)
        .is_file());

    // Start can proceed in degraded mode.
    deployment.build(&env_file).unwrap();
    deployment.up(&env_file).unwrap();
}

/// Status data stays available when every endpoint is down.
#[tokio::test]
async fn test_status_with_all_endpoints_down() {
    let project = TempDir::new().expect("Failed to create temp dir");

    let deployment = Deployment::new(
        config_in(&project),
        RecordingOrchestrator::default(),
        ScriptedProbe::new(&[]),
        InstantClock::default(),
    );

    let processes = deployment.processes().unwrap();
    assert!(processes.contains("api"));

    let report = deployment.check_health().await;
    assert_eq!(report.endpoints.len(), 2);
    assert!(report.endpoints.iter().all(|e| !e.reachable));
}

/// Configuration loaded from disk drives the probe URLs.
#[tokio::test]
async fn test_config_file_overrides_probe_urls() {
    let project = TempDir::new().expect("Failed to create temp dir");
    let config_path = project.path().join("avstack.yaml");
    std::fs::write(
        &config_path,
        r#"
services:
  - name: backend
    port: 9100
    health_path: /healthz
    inspect_body: true
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_file(&config_path).unwrap();
    let deployment = Deployment::new(
        config,
        RecordingOrchestrator::default(),
        ScriptedProbe::new(&[(
            "http://localhost:9100/healthz",
            true,
            r#"{"dictionary_loaded": false}"#,
        )]),
        InstantClock::default(),
    );

    let report = deployment.check_health().await;
    assert_eq!(report.endpoints.len(), 1);
    assert!(report.endpoints[0].reachable);
    assert_eq!(report.endpoints[0].dictionary_loaded(), Some(false));
}
