use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::MqAppConfig;

use crate::models::scoring::ResubmissionPolicy;

/// Judge worker pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    /// Identifier used in logs. Default: "judge-1".
    #[serde(default = "default_worker_id")]
    pub id: String,
    /// Number of submissions judged concurrently. Default: 4.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Submissions that may wait for a free worker before ingress is refused. Default: 64.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_worker_id() -> String {
    "judge-1".into()
}
fn default_pool_size() -> usize {
    4
}
fn default_queue_capacity() -> usize {
    64
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            id: default_worker_id(),
            pool_size: default_pool_size(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Execution sandbox configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct SandboxConfig {
    /// Parent directory for per-run workspaces. Default: the system temp dir.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    /// Wall-clock bound on the compile stage. Default: 5000.
    #[serde(default = "default_compile_timeout_ms")]
    pub compile_timeout_ms: u64,
    /// Wall-clock bound on one run of the program. Default: 2000.
    #[serde(default = "default_execution_timeout_ms")]
    pub execution_timeout_ms: u64,
    /// Cap on bytes captured from each of stdout and stderr. Default: 16 MiB.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: u64,
}

fn default_compile_timeout_ms() -> u64 {
    5000
}
fn default_execution_timeout_ms() -> u64 {
    2000
}
fn default_max_output_bytes() -> u64 {
    16 * 1024 * 1024
}

impl SandboxConfig {
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_millis(self.compile_timeout_ms)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_millis(self.execution_timeout_ms)
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            compile_timeout_ms: default_compile_timeout_ms(),
            execution_timeout_ms: default_execution_timeout_ms(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

/// Score side-effect configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScoringConfig {
    #[serde(default)]
    pub resubmission: ResubmissionPolicy,
}

/// Judge application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct JudgeAppConfig {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
}

impl JudgeAppConfig {
    /// Defaults, then `config/judge.*` (or `$JUDGE_CONFIG`), then `JUDGE__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("JUDGE_CONFIG").unwrap_or_else(|_| "config/judge".to_string());

        Self::defaults()?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("JUDGE").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("worker.id", default_worker_id())?
            .set_default("worker.pool_size", default_pool_size() as i64)?
            .set_default("worker.queue_capacity", default_queue_capacity() as i64)?
            .set_default("sandbox.compile_timeout_ms", default_compile_timeout_ms() as i64)?
            .set_default("sandbox.execution_timeout_ms", default_execution_timeout_ms() as i64)?
            .set_default("sandbox.max_output_bytes", default_max_output_bytes() as i64)?
            .set_default("scoring.resubmission", "every_acceptance")?
            .set_default("mq.enabled", false)
    }
}
