pub mod domain;
pub mod error;
pub mod ingest;
pub mod predict;
pub mod service;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

    /// Cross-origin policy applied by the HTTP transport.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CorsPolicy {
        AllowAll,
        AllowList(Vec<String>),
    }

    impl CorsPolicy {
        /// Unset, empty, or `*` means allow all; anything else is a comma-separated origin list.
        pub fn parse(raw: Option<&str>) -> Self {
            let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
                return Self::AllowAll;
            };

            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();

            if origins.is_empty() || origins.iter().any(|o| o == "*") {
                return Self::AllowAll;
            }
            Self::AllowList(origins)
        }
    }

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub cors: CorsPolicy,
        pub max_upload_bytes: usize,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                cors: CorsPolicy::parse(std::env::var("CORS_ALLOW_ORIGINS").ok().as_deref()),
                max_upload_bytes: parse_max_upload_bytes(
                    std::env::var("MAX_UPLOAD_BYTES").ok().as_deref(),
                )?,
                sentry_dsn: std::env::var("SENTRY_DSN").ok().filter(|s| !s.trim().is_empty()),
            })
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                cors: CorsPolicy::AllowAll,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                sentry_dsn: None,
            }
        }
    }

    fn parse_max_upload_bytes(raw: Option<&str>) -> anyhow::Result<usize> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(DEFAULT_MAX_UPLOAD_BYTES);
        };
        let n = raw
            .parse::<usize>()
            .with_context(|| format!("MAX_UPLOAD_BYTES must be a positive integer (got {raw})"))?;
        anyhow::ensure!(n > 0, "MAX_UPLOAD_BYTES must be a positive integer (got {raw})");
        Ok(n)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn cors_defaults_to_allow_all() {
            assert_eq!(CorsPolicy::parse(None), CorsPolicy::AllowAll);
            assert_eq!(CorsPolicy::parse(Some("  ")), CorsPolicy::AllowAll);
            assert_eq!(CorsPolicy::parse(Some("*")), CorsPolicy::AllowAll);
        }

        #[test]
        fn cors_parses_allow_list() {
            let policy = CorsPolicy::parse(Some("https://a.example, https://b.example,"));
            assert_eq!(
                policy,
                CorsPolicy::AllowList(vec![
                    "https://a.example".to_string(),
                    "https://b.example".to_string(),
                ])
            );
        }

        #[test]
        fn wildcard_inside_list_allows_all() {
            assert_eq!(
                CorsPolicy::parse(Some("https://a.example,*")),
                CorsPolicy::AllowAll
            );
        }

        #[test]
        fn max_upload_bytes_falls_back_and_validates() {
            assert_eq!(parse_max_upload_bytes(None).unwrap(), DEFAULT_MAX_UPLOAD_BYTES);
            assert_eq!(parse_max_upload_bytes(Some("2048")).unwrap(), 2048);
            assert!(parse_max_upload_bytes(Some("lots")).is_err());
            assert!(parse_max_upload_bytes(Some("0")).is_err());
        }
    }
}
