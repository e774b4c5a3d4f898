use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub backend: BackendConfig,
    pub audio: AudioConfig,
    pub auth: AuthConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the transcription backend, e.g. "http://127.0.0.1:5000"
    pub base_url: String,

    /// Upload bodies are streamed in chunks of this size so that progress
    /// events fire as bytes go out
    #[serde(default = "default_chunk_bytes")]
    pub upload_chunk_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Identity provider REST endpoint
    pub endpoint: String,

    /// Web API key appended to every provider call
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory where downloadable documents are written
    pub output_dir: String,
}

fn default_chunk_bytes() -> usize {
    64 * 1024
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "echonote".to_string(),
            },
            backend: BackendConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                upload_chunk_bytes: default_chunk_bytes(),
            },
            audio: AudioConfig {
                sample_rate: 16000,
                channels: 1,
            },
            auth: AuthConfig {
                endpoint: "https://identitytoolkit.googleapis.com/v1".to_string(),
                api_key: String::new(),
            },
            export: ExportConfig {
                output_dir: "exports".to_string(),
            },
        }
    }
}
