//! Which request paths the session gate looks at

/// Path prefixes (after the leading `/`) the gate never touches
pub const EXCLUDED_PREFIXES: &[&str] = &[
    "_next/static",
    "_next/image",
    "favicon.ico",
    "sitemap.xml",
    "robots.txt",
    "api",
];

/// Decides whether a path goes through the gate at all
#[derive(Debug, Clone)]
pub struct PathMatcher {
    excluded: Vec<String>,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self {
            excluded: EXCLUDED_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl PathMatcher {
    /// A matcher that excludes nothing
    pub fn all() -> Self {
        Self { excluded: Vec::new() }
    }

    pub fn with_excluded(mut self, prefix: &str) -> Self {
        self.excluded
            .push(prefix.trim_start_matches('/').to_string());
        self
    }

    /// True when the gate must evaluate `path`.
    ///
    /// Exclusion is a plain prefix test, so `/apiary` is excluded along
    /// with `/api/...`.
    pub fn matches(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        !self.excluded.iter().any(|prefix| rest.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_paths() {
        let matcher = PathMatcher::default();
        for path in [
            "/_next/static/chunks/main.js",
            "/_next/image?url=%2Fposter.png",
            "/favicon.ico",
            "/sitemap.xml",
            "/robots.txt",
            "/api",
            "/api/peliculas",
        ] {
            assert!(!matcher.matches(path), "{} should be excluded", path);
        }
    }

    #[test]
    fn test_gated_paths() {
        let matcher = PathMatcher::default();
        for path in ["/", "/cliente", "/admin", "/auth/login", "/perfil", "/_next/data"] {
            assert!(matcher.matches(path), "{} should be gated", path);
        }
    }

    #[test]
    fn test_custom_exclusion() {
        let matcher = PathMatcher::all().with_excluded("/static");
        assert!(!matcher.matches("/static/app.css"));
        assert!(matcher.matches("/api/peliculas"));
    }
}
