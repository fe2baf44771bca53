use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub frontend: FrontendConfig,

    #[serde(default)]
    pub components: ComponentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_lan_access: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_lan_access: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

/// A single `pattern -> replacement` path rewrite
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewriteEntry {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL requests are forwarded to; its path is prepended to the rewritten path
    #[serde(default = "default_target")]
    pub target: String,

    /// Only paths starting with this prefix are proxied
    #[serde(default = "default_mount")]
    pub mount: String,

    #[serde(default = "default_rewrite")]
    pub path_rewrite: Vec<RewriteEntry>,

    #[serde(default = "default_true")]
    pub change_origin: bool,

    /// Append X-Forwarded-* headers
    #[serde(default)]
    pub xfwd: bool,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Outbound HTTP proxy for upstream calls
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            mount: default_mount(),
            path_rewrite: default_rewrite(),
            change_origin: true,
            xfwd: false,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FrontendConfig {
    /// Built front-end bundle; unset means non-proxied paths answer 404
    #[serde(default)]
    pub dist_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentsConfig {
    /// Directory the manifest lives in; scanned paths are relative to it
    #[serde(default = "default_components_root")]
    pub root: PathBuf,

    #[serde(default = "default_components_dirs")]
    pub dirs: Vec<PathBuf>,

    #[serde(default = "default_dts")]
    pub dts: PathBuf,

    /// Globally registered library components (naive-ui, vue-router)
    #[serde(default)]
    pub library: Vec<String>,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            root: default_components_root(),
            dirs: default_components_dirs(),
            dts: default_dts(),
            library: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            frontend: FrontendConfig::default(),
            components: ComponentsConfig::default(),
        }
    }
}

// Default value functions
fn default_port() -> u16 { 5173 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_target() -> String { "https://pic.furrysp.top/@api".to_string() }
fn default_mount() -> String { "/@api/".to_string() }
fn default_true() -> bool { true }
fn default_connect_timeout() -> u64 { 20 }
fn default_request_timeout() -> u64 { 120 }
fn default_max_body_bytes() -> usize { 100 * 1024 * 1024 }
fn default_components_root() -> PathBuf { PathBuf::from("src") }
fn default_components_dirs() -> Vec<PathBuf> { vec![PathBuf::from("components")] }
fn default_dts() -> PathBuf { PathBuf::from("src/components.d.ts") }

fn default_rewrite() -> Vec<RewriteEntry> {
    vec![RewriteEntry {
        pattern: "^/@api/".to_string(),
        replacement: "/".to_string(),
    }]
}

/// Get default config file path
/// Uses ~/.config/filegate/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("filegate")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/filegate/config.toml)
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    load_config_with_source(path).map(|(config, _)| config)
}

/// Same lookup as [`load_config`], also returning the file that was read
/// (`None` when built-in defaults are in effect)
pub fn load_config_with_source(path: Option<PathBuf>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok((config, Some(config_path)));
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    let local_config = PathBuf::from("config.toml");
    if local_config.exists() {
        match std::fs::read_to_string(&local_config) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from current directory {:?}", local_config);
                    return Ok((config, Some(local_config)));
                }
                Err(e) => {
                    tracing::error!("Failed to parse ./config.toml: {}. Falling back to default path.", e);
                }
            },
            Err(e) => {
                tracing::error!("Failed to read ./config.toml: {}. Falling back to default path.", e);
            }
        }
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let content = std::fs::read_to_string(&default_path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok((config, Some(default_path)))
    } else {
        tracing::info!("No config file found, using defaults");
        Ok((Config::default(), None))
    }
}

/// Expand ~ in path to home directory
pub fn expand_path(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_deployment() {
        let config = Config::default();
        assert_eq!(config.upstream.target, "https://pic.furrysp.top/@api");
        assert_eq!(config.upstream.mount, "/@api/");
        assert!(config.upstream.change_origin);
        assert_eq!(
            config.upstream.path_rewrite,
            vec![RewriteEntry { pattern: "^/@api/".into(), replacement: "/".into() }]
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [upstream]
            target = "http://localhost:8080"
            change_origin = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.upstream.target, "http://localhost:8080");
        assert!(!config.upstream.change_origin);
        assert_eq!(config.upstream.mount, "/@api/");
        assert_eq!(config.upstream.path_rewrite.len(), 1);
        assert!(config.frontend.dist_dir.is_none());
    }

    #[test]
    fn rewrite_table_parses_in_order() {
        let config: Config = toml::from_str(
            r#"
            [[upstream.path_rewrite]]
            pattern = "^/@api/v1/"
            replacement = "/v1/"

            [[upstream.path_rewrite]]
            pattern = "^/@api/"
            "#,
        )
        .unwrap();

        let patterns: Vec<_> = config.upstream.path_rewrite.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, ["^/@api/v1/", "^/@api/"]);
        assert_eq!(config.upstream.path_rewrite[1].replacement, "");
    }

    #[test]
    fn lan_access_binds_all_interfaces() {
        let mut server = ServerConfig::default();
        assert_eq!(server.bind_address(), "127.0.0.1");
        server.allow_lan_access = true;
        assert_eq!(server.bind_address(), "0.0.0.0");
    }

    #[test]
    fn load_config_rejects_missing_explicit_path() {
        let err = load_config(Some(PathBuf::from("/nonexistent/filegate.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn load_config_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn load_config_reports_the_file_it_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(&path, "[upstream]\nxfwd = true\n").unwrap();

        let (config, source) = load_config_with_source(Some(path.clone())).unwrap();
        assert!(config.upstream.xfwd);
        assert_eq!(source, Some(path));
    }
}
