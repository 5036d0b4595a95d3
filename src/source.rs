//! Source resolution: rewriting known cross-origin asset URLs to the
//! deployment's same-origin proxy path.
//!
//! Canvas-style pixel readback refuses cross-origin sources, so every known
//! remote-asset URL must be rewritten to the proxy *before* the fetch. This
//! is a precondition for export, not an optimization. Unknown URLs pass
//! through unchanged.

// ============================================================================
// Rewrite Rules
// ============================================================================

/// A single rewrite rule: URLs whose host ends with `host_suffix` are
/// rewritten to `proxy_prefix` with the object key (the URL path) appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    /// Host suffix to match, e.g. `".s3.amazonaws.com"`.
    pub host_suffix: String,
    /// Same-origin prefix the object key is appended to,
    /// e.g. `"/api/assets"`.
    pub proxy_prefix: String,
}

impl ProxyRule {
    pub fn new(host_suffix: impl Into<String>, proxy_prefix: impl Into<String>) -> Self {
        Self {
            host_suffix: host_suffix.into(),
            proxy_prefix: proxy_prefix.into(),
        }
    }
}

/// Rewrites known remote-asset URLs to an equivalent same-origin proxy
/// path, preserving the object key. The rule set must match the
/// deployment's asset-proxy routing and is therefore configurable.
///
/// Embedders fetching from outside the serving origin should configure an
/// absolute `proxy_prefix` (scheme and host included); the stock rule uses
/// an origin-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResolver {
    rules: Vec<ProxyRule>,
}

impl Default for SourceResolver {
    /// The stock deployment rule: bucket-hosted assets are re-served under
    /// `/api/assets`.
    fn default() -> Self {
        Self {
            rules: vec![ProxyRule::new(".s3.amazonaws.com", "/api/assets")],
        }
    }
}

impl SourceResolver {
    /// A resolver with a custom rule set.
    pub fn new(rules: Vec<ProxyRule>) -> Self {
        Self { rules }
    }

    /// A resolver that never rewrites.
    pub fn passthrough() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rewrites `url` if its host matches a rule; otherwise returns it
    /// unchanged. Relative URLs and anything unparseable pass through.
    pub fn rewrite(&self, url: &str) -> String {
        let Some((host, path)) = split_host_path(url) else {
            return url.to_string();
        };

        for rule in &self.rules {
            if host.ends_with(rule.host_suffix.as_str()) {
                let prefix = rule.proxy_prefix.trim_end_matches('/');
                let rewritten = format!("{}/{}", prefix, path.trim_start_matches('/'));
                tracing::debug!(from = url, to = %rewritten, "rewrote asset url to proxy");
                return rewritten;
            }
        }
        url.to_string()
    }
}

/// Splits an absolute http(s) URL into (host, path-and-query). Returns
/// `None` for anything else.
fn split_host_path(url: &str) -> Option<(&str, &str)> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    match rest.find('/') {
        Some(slash) => Some((&rest[..slash], &rest[slash..])),
        None => Some((rest, "/")),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_host_is_rewritten_with_key_preserved() {
        let resolver = SourceResolver::default();
        let rewritten =
            resolver.rewrite("https://media.s3.amazonaws.com/logos/acme.png?v=2");
        assert_eq!(rewritten, "/api/assets/logos/acme.png?v=2");
    }

    #[test]
    fn unknown_host_passes_through() {
        let resolver = SourceResolver::default();
        let url = "https://cdn.example.com/image.png";
        assert_eq!(resolver.rewrite(url), url);
    }

    #[test]
    fn relative_and_malformed_urls_pass_through() {
        let resolver = SourceResolver::default();
        assert_eq!(resolver.rewrite("/already/local.png"), "/already/local.png");
        assert_eq!(resolver.rewrite("not a url"), "not a url");
    }

    #[test]
    fn custom_rules_are_honored() {
        let resolver = SourceResolver::new(vec![ProxyRule::new(
            ".storage.googleapis.com",
            "/proxy/gcs/",
        )]);
        assert_eq!(
            resolver.rewrite("https://bucket.storage.googleapis.com/key/img.jpg"),
            "/proxy/gcs/key/img.jpg"
        );
    }

    #[test]
    fn passthrough_resolver_never_rewrites() {
        let resolver = SourceResolver::passthrough();
        let url = "https://media.s3.amazonaws.com/logos/acme.png";
        assert_eq!(resolver.rewrite(url), url);
    }
}
