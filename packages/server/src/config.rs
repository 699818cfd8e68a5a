use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{StorageAppConfig, StorageBackend};

/// Largest width or height a thumbnail tier may request.
pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Uploads that reach this many bytes are rejected as too large.
pub const DEFAULT_UPLOAD_LIMIT: u64 = 50 * 1024 * 1024;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThumbnailConfig {
    /// Share one render between concurrent misses for the same thumbnail.
    pub dedupe_inflight: bool,
    /// Encoder quality for JPEG thumbnails (1-100).
    pub jpeg_quality: u8,
    /// Tiers asking for more pixels than this on either side are rejected.
    pub max_dimension: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            dedupe_inflight: false,
            jpeg_quality: 85,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// `Cache-Control: max-age` sent with every image response, in seconds.
    pub max_age: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_age: 86_400 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    #[serde(default)]
    pub storage: StorageAppConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("RESIZER_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("log.level", "info")?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.originals_dir", "./data/originals")?
            .set_default("storage.thumbnails_dir", "./data/thumbnails")?
            .set_default("upload.max_bytes", DEFAULT_UPLOAD_LIMIT)?
            .set_default("thumbnails.dedupe_inflight", false)?
            .set_default("thumbnails.jpeg_quality", 85)?
            .set_default("thumbnails.max_dimension", DEFAULT_MAX_DIMENSION)?
            .set_default("cache.max_age", 86_400)?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., RESIZER__SERVER__PORT)
            .add_source(Environment::with_prefix("RESIZER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            log: LogConfig {
                level: "info".into(),
            },
            storage: StorageAppConfig::default(),
            upload: UploadConfig::default(),
            thumbnails: ThumbnailConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}
