use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::{env, str::FromStr};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_KEY_ATTEMPTS: usize = 8;

/// Which object store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// SQLite metadata plus payload files under `storage_dir`.
    Disk,
    /// Process memory; contents vanish on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "disk" => Ok(StoreBackend::Disk),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown store backend `{}`", other),
        }
    }
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub storage_dir: String,
    pub database_url: String,
    pub assets_dir: String,
    /// Origin used in returned URLs; derived from the `Host` header when unset.
    pub public_url: Option<String>,
    pub max_upload_bytes: usize,
    pub key_attempts: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Anonymous file sharing with short word keys")]
pub struct Args {
    /// Host to bind to (overrides EASY_SHARE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides EASY_SHARE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Object store backend (overrides EASY_SHARE_BACKEND)
    #[arg(long, value_enum)]
    pub backend: Option<StoreBackend>,

    /// Directory where object payloads are stored (overrides EASY_SHARE_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides EASY_SHARE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory holding index.html and upload.html (overrides EASY_SHARE_ASSETS_DIR)
    #[arg(long)]
    pub assets_dir: Option<String>,

    /// Public origin for returned links, e.g. https://share.example.com (overrides EASY_SHARE_PUBLIC_URL)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Maximum request body size in bytes (overrides EASY_SHARE_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Key draws attempted before an upload gives up (overrides EASY_SHARE_KEY_ATTEMPTS)
    #[arg(long)]
    pub key_attempts: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::from_args(args)?, migrate))
    }

    /// Merge parsed CLI args over environment variables and defaults.
    pub fn from_args(args: Args) -> Result<Self> {
        let env_host = env::var("EASY_SHARE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_parse("EASY_SHARE_PORT", 8787u16)?;
        let env_backend = env_parse("EASY_SHARE_BACKEND", StoreBackend::Disk)?;
        let env_storage =
            env::var("EASY_SHARE_STORAGE_DIR").unwrap_or_else(|_| "./data/objects".into());
        let env_db = env::var("EASY_SHARE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/easy_share.db".into());
        let env_assets = env::var("EASY_SHARE_ASSETS_DIR").unwrap_or_else(|_| "./assets".into());
        let env_public = env::var("EASY_SHARE_PUBLIC_URL").ok();
        let env_max_upload = env_parse("EASY_SHARE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let env_attempts = env_parse("EASY_SHARE_KEY_ATTEMPTS", DEFAULT_KEY_ATTEMPTS)?;

        let key_attempts = args.key_attempts.unwrap_or(env_attempts);
        if key_attempts == 0 {
            anyhow::bail!("key attempts must be at least 1");
        }

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            backend: args.backend.unwrap_or(env_backend),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
            assets_dir: args.assets_dir.unwrap_or(env_assets),
            public_url: args
                .public_url
                .or(env_public)
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
            key_attempts,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse an env var, falling back to `default` when it is unset.
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|err| anyhow::anyhow!("{}", err))
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let args = Args::parse_from([
            "easy-share",
            "--port",
            "9000",
            "--backend",
            "memory",
            "--public-url",
            "https://share.example.com/",
            "--key-attempts",
            "3",
        ]);
        let cfg = AppConfig::from_args(args).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert_eq!(cfg.public_url.as_deref(), Some("https://share.example.com"));
        assert_eq!(cfg.key_attempts, 3);
        assert_eq!(cfg.addr(), format!("{}:9000", cfg.host));
    }

    #[test]
    fn zero_key_attempts_is_rejected() {
        let args = Args::parse_from(["easy-share", "--key-attempts", "0"]);
        assert!(AppConfig::from_args(args).is_err());
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!("DISK".parse::<StoreBackend>().unwrap(), StoreBackend::Disk);
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("s3".parse::<StoreBackend>().is_err());
    }
}
