use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub pipeline: PipelineConfig,
    pub context: ContextConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            enable_cors: true,
        }
    }
}

/// Policy of a single cache tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierConfig {
    /// Entries older than this are never served. `None` disables expiry.
    pub ttl_secs: Option<u64>,
    /// Size bound that triggers inline cleanup.
    pub max_entries: usize,
}

impl TierConfig {
    pub fn new(ttl_secs: Option<u64>, max_entries: usize) -> Self {
        Self {
            ttl_secs,
            max_entries,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    /// Overlay the fields a source actually set.
    fn patched(mut self, patch: TierPatch) -> Self {
        if let Some(ttl) = patch.ttl_secs {
            self.ttl_secs = Some(ttl);
        }
        if let Some(max) = patch.max_entries {
            self.max_entries = max;
        }
        self
    }
}

/// A tier section as written in a config source; unset fields keep the
/// tier's built-in policy.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TierPatch {
    ttl_secs: Option<u64>,
    max_entries: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CachePatch {
    session: TierPatch,
    global: TierPatch,
    template: TierPatch,
    result_set: TierPatch,
}

impl From<CachePatch> for CacheConfig {
    fn from(patch: CachePatch) -> Self {
        let defaults = CacheConfig::default();
        Self {
            session: defaults.session.patched(patch.session),
            global: defaults.global.patched(patch.global),
            template: defaults.template.patched(patch.template),
            result_set: defaults.result_set.patched(patch.result_set),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(from = "CachePatch")]
pub struct CacheConfig {
    pub session: TierConfig,
    pub global: TierConfig,
    pub template: TierConfig,
    pub result_set: TierConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            session: TierConfig::new(Some(30 * 60), 500),
            global: TierConfig::new(Some(24 * 60 * 60), 1000),
            template: TierConfig::new(None, 200),
            result_set: TierConfig::new(Some(60 * 60), 300),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_input_chars: usize,
    pub max_essay_chars: usize,
    pub llm_timeout_ms: u64,
}

impl PipelineConfig {
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 2000,
            max_essay_chars: 6000,
            llm_timeout_ms: 15_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContextConfig {
    /// Older turns accumulated before the rolling summary is regenerated.
    pub compression_threshold: usize,
    pub conversation_token_budget: usize,
    pub summary_token_budget: usize,
    pub structure_token_budget: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            compression_threshold: 4,
            conversation_token_budget: 400,
            summary_token_budget: 80,
            structure_token_budget: 120,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    /// OpenAI-compatible endpoint root, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            temperature: 0.4,
            max_tokens: Some(1200),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,redacta=debug".into(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("REDACTA_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__PIPELINE__LLM_TIMEOUT_MS=5000 to pipeline.llm_timeout_ms
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
