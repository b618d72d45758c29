//! # Configuration Module
//!
//! Runtime settings for the linkage job and the command line tool, read from
//! the process environment (a `.env` file is honored by the binary).

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{LexiconError, LexiconResult};
use crate::ingredient_model::Locale;
use crate::lexicon::{DedupPolicy, Vocabulary};
use crate::ranker::RankOptions;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_VOCABULARY_PATH: &str = "LEXICON_VOCABULARY_PATH";
pub const ENV_LOCALES: &str = "LEXICON_LOCALES";
pub const ENV_DEDUP_POLICY: &str = "LEXICON_DEDUP_POLICY";
pub const ENV_RANK_LIMIT: &str = "LEXICON_RANK_LIMIT";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(LexiconError::Config(format!("unknown log format '{}'", other))),
        }
    }
}

/// Settings for the lexicon tooling
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconConfig {
    /// PostgreSQL connection string, required by database-backed commands only
    pub database_url: Option<String>,
    /// JSON vocabulary file replacing the built-in lists
    pub vocabulary_path: Option<PathBuf>,
    /// Locales processed by the linkage job
    pub locales: Vec<Locale>,
    pub dedup_policy: DedupPolicy,
    pub rank_limit: Option<usize>,
    pub log_format: LogFormat,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            vocabulary_path: None,
            locales: Locale::ALL.to_vec(),
            dedup_policy: DedupPolicy::default(),
            rank_limit: None,
            log_format: LogFormat::default(),
        }
    }
}

impl LexiconConfig {
    /// Load from the process environment
    pub fn from_env() -> LexiconResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; unset and blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> LexiconResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.database_url = get(ENV_DATABASE_URL);
        config.vocabulary_path = get(ENV_VOCABULARY_PATH).map(PathBuf::from);

        if let Some(locales) = get(ENV_LOCALES) {
            config.locales = locales
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(Locale::from_str)
                .collect::<LexiconResult<Vec<_>>>()?;
        }
        if let Some(policy) = get(ENV_DEDUP_POLICY) {
            config.dedup_policy = policy.parse()?;
        }
        if let Some(limit) = get(ENV_RANK_LIMIT) {
            let limit = limit.parse::<usize>().map_err(|_| {
                LexiconError::Config(format!("{} must be a positive integer, got '{}'", ENV_RANK_LIMIT, limit))
            })?;
            config.rank_limit = Some(limit);
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.log_format = format.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> LexiconResult<()> {
        if self.locales.is_empty() {
            return Err(LexiconError::Config(format!("{} cannot be empty", ENV_LOCALES)));
        }
        if self.rank_limit == Some(0) {
            return Err(LexiconError::Config(format!("{} must be greater than 0", ENV_RANK_LIMIT)));
        }
        Ok(())
    }

    /// Database URL, or a configuration error naming the missing variable
    pub fn require_database_url(&self) -> LexiconResult<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| LexiconError::Config(format!("{} must be set", ENV_DATABASE_URL)))
    }

    /// Vocabularies for the configured locales, from the file when set, built-in otherwise
    pub fn vocabularies(&self) -> LexiconResult<Vec<Vocabulary>> {
        let vocabularies = match &self.vocabulary_path {
            Some(path) => Vocabulary::from_file(path)?,
            None => Locale::ALL.iter().map(|&l| Vocabulary::builtin(l)).collect(),
        };
        Ok(vocabularies
            .into_iter()
            .filter(|v| self.locales.contains(&v.locale))
            .collect())
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            min_match_percentage: 0,
            limit: self.rank_limit,
        }
    }
}
