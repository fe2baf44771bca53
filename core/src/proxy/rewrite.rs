//! Path rewriting
//! Ordered `regex -> replacement` table; the first matching rule wins

use regex::Regex;

use crate::config::RewriteEntry;
use crate::proxy::error::ProxyError;

#[derive(Debug, Clone)]
struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

#[derive(Debug, Clone, Default)]
pub struct PathRewrite {
    rules: Vec<RewriteRule>,
}

impl PathRewrite {
    pub fn new(entries: &[RewriteEntry]) -> Result<Self, ProxyError> {
        let rules = entries
            .iter()
            .map(|entry| {
                let pattern = Regex::new(&entry.pattern).map_err(|e| ProxyError::InvalidRewrite {
                    pattern: entry.pattern.clone(),
                    source: e,
                })?;
                Ok(RewriteRule {
                    pattern,
                    replacement: entry.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, ProxyError>>()?;

        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite a request path. Only the first occurrence of the first
    /// matching pattern is replaced.
    pub fn apply(&self, path: &str) -> String {
        for rule in &self.rules {
            if rule.pattern.is_match(path) {
                let rewritten = rule.pattern.replace(path, rule.replacement.as_str());
                tracing::trace!("Rewrote path {} -> {} ({})", path, rewritten, rule.pattern);
                return rewritten.into_owned();
            }
        }
        path.to_string()
    }
}
