//! Proxy rule
//! Built once from `[upstream]` config and evaluated per request

use reqwest::Url;

use crate::config::UpstreamConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::rewrite::PathRewrite;

#[derive(Debug, Clone)]
pub struct ProxyRule {
    mount: String,
    rewrite: PathRewrite,
    target: Url,
    pub change_origin: bool,
    pub xfwd: bool,
}

impl ProxyRule {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let target = Url::parse(&config.target).map_err(|e| ProxyError::InvalidTarget {
            target: config.target.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(target.scheme(), "http" | "https") || target.host_str().is_none() {
            return Err(ProxyError::InvalidTarget {
                target: config.target.clone(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }

        if !config.mount.starts_with('/') {
            return Err(ProxyError::InvalidTarget {
                target: config.target.clone(),
                reason: format!("mount prefix {:?} must start with '/'", config.mount),
            });
        }

        let rewrite = PathRewrite::new(&config.path_rewrite)?;
        if rewrite.is_empty() {
            tracing::warn!(
                "No path rewrite configured, {} is forwarded with the prefix intact",
                config.mount
            );
        }

        Ok(Self {
            mount: config.mount.clone(),
            rewrite,
            target,
            change_origin: config.change_origin,
            xfwd: config.xfwd,
        })
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Whether a request path is routed through the proxy at all
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.mount)
    }

    pub fn rewrite_path(&self, path: &str) -> String {
        let rewritten = self.rewrite.apply(path);
        if rewritten.is_empty() {
            "/".to_string()
        } else if rewritten.starts_with('/') {
            rewritten
        } else {
            format!("/{}", rewritten)
        }
    }

    /// Upstream URL for a request: target base path + rewritten path, query untouched
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let rewritten = self.rewrite_path(path);
        let base = self.target.path().trim_end_matches('/');

        let mut url = self.target.clone();
        url.set_path(&format!("{}{}", base, rewritten));
        url.set_query(query);
        url.set_fragment(None);
        url
    }

    /// `scheme://host[:port]` of the upstream
    pub fn upstream_origin(&self) -> String {
        self.target.origin().ascii_serialization()
    }

    /// Value for the outbound `Host` header when changing origin
    pub fn upstream_host(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}
