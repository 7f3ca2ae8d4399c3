use serde::Deserialize;

/// App-level MQ configuration for the notification transport.
#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    /// Whether events go to the message queue. When false they are only logged. Default: false.
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    /// Redis connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    /// Prefix prepended to every topic to form the queue name. Default: "judge".
    #[serde(default = "default_mq_topic_prefix")]
    pub topic_prefix: String,
}

fn default_mq_enabled() -> bool {
    false
}
fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}
fn default_mq_topic_prefix() -> String {
    "judge".into()
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            topic_prefix: default_mq_topic_prefix(),
        }
    }
}
