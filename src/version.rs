use std::fmt;

use chrono::DateTime;

const DEFAULT_VERSION: &str = "dev";
const DEFAULT_COMMIT: &str = "none";
const DEFAULT_DATE: &str = "unknown";
const SHORT_COMMIT_LEN: usize = 7;

/// Version, commit and build date reported by `--version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    version: String,
    commit: String,
    date: String,
}

impl BuildInfo {
    /// Builds the metadata, shortening commit hashes and reducing RFC 3339 timestamps to a date.
    pub fn new(version: &str, commit: &str, date: &str) -> Self {
        Self {
            version: normalize_version(version),
            commit: normalize_commit(commit),
            date: normalize_date(date),
        }
    }

    /// Metadata embedded at compile time, falling back to the package version.
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("CLI_TEMPLATE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION")),
            option_env!("CLI_TEMPLATE_COMMIT").unwrap_or_default(),
            option_env!("CLI_TEMPLATE_DATE").unwrap_or_default(),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn commit(&self) -> &str {
        &self.commit
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (commit: {}, built at: {})",
            self.version, self.commit, self.date
        )
    }
}

fn normalize_version(version: &str) -> String {
    match version.trim() {
        "" | "(devel)" => DEFAULT_VERSION.to_string(),
        version => version.to_string(),
    }
}

fn normalize_commit(commit: &str) -> String {
    match commit.trim() {
        "" => DEFAULT_COMMIT.to_string(),
        commit => commit.chars().take(SHORT_COMMIT_LEN).collect(),
    }
}

fn normalize_date(date: &str) -> String {
    match date.trim() {
        "" => DEFAULT_DATE.to_string(),
        date => DateTime::parse_from_rfc3339(date)
            .map(|parsed| parsed.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| date.to_string()),
    }
}
