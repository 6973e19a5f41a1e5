use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Engine runtime configuration.
    pub engine: EngineConfig,
    /// Classifier thresholds.
    pub classifier: ClassifierConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// JSON lines.
    Json,
}

/// Engine runtime configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Seed for the closing-remark and round-order generator. Unset means entropy.
    pub seed: Option<u64>,
    /// Newline-delimited JSON event log. Unset disables the file sink.
    pub events_path: Option<PathBuf>,
}

/// Thresholds and lexicon extensions for the response classifier
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// A token with at least five letters is gibberish below this vowel ratio.
    pub vowel_ratio_threshold: f64,
    /// Consecutive consonants that mark a token as gibberish.
    pub consonant_run: usize,
    /// Share of substantive tokens that must be gibberish for the whole text to be.
    pub gibberish_token_share: f64,
    /// Minimum word count for a reasoning statement to count as a concrete idea.
    pub concrete_idea_min_words: usize,
    /// Extra domain keyword stems appended to the built-in lexicon.
    pub extra_domain_keywords: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let engine = EngineConfig {
            seed: match env::var("SCAFFOLD_SEED") {
                Ok(raw) => Some(raw.trim().parse().map_err(|_| AppError::Config {
                    message: format!("SCAFFOLD_SEED must be an unsigned integer, got '{}'", raw),
                })?),
                Err(_) => None,
            },
            events_path: env::var("SCAFFOLD_EVENTS_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        let defaults = ClassifierConfig::default();
        let classifier = ClassifierConfig {
            vowel_ratio_threshold: parse_var("GIBBERISH_VOWEL_RATIO", defaults.vowel_ratio_threshold)?,
            consonant_run: parse_var("GIBBERISH_CONSONANT_RUN", defaults.consonant_run)?,
            gibberish_token_share: parse_var("GIBBERISH_TOKEN_SHARE", defaults.gibberish_token_share)?,
            concrete_idea_min_words: parse_var(
                "CONCRETE_IDEA_MIN_WORDS",
                defaults.concrete_idea_min_words,
            )?,
            extra_domain_keywords: env::var("DOMAIN_KEYWORDS")
                .map(|s| {
                    s.split(',')
                        .map(|k| k.trim().to_lowercase())
                        .filter(|k| !k.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };
        classifier.validate()?;

        Ok(Config {
            logging,
            engine,
            classifier,
        })
    }
}

/// Parse `name` when set, `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| AppError::Config {
            message: format!("{} has an invalid value '{}'", name, raw),
        }),
        Err(_) => Ok(default),
    }
}

impl ClassifierConfig {
    /// Reject thresholds that would make the gibberish rule degenerate.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.vowel_ratio_threshold > 0.0 && self.vowel_ratio_threshold < 1.0) {
            return Err(AppError::Config {
                message: format!(
                    "GIBBERISH_VOWEL_RATIO must be between 0 and 1, got {}",
                    self.vowel_ratio_threshold
                ),
            });
        }
        if !(self.gibberish_token_share > 0.0 && self.gibberish_token_share <= 1.0) {
            return Err(AppError::Config {
                message: format!(
                    "GIBBERISH_TOKEN_SHARE must be in (0, 1], got {}",
                    self.gibberish_token_share
                ),
            });
        }
        if self.concrete_idea_min_words == 0 {
            return Err(AppError::Config {
                message: "CONCRETE_IDEA_MIN_WORDS must be at least 1".to_string(),
            });
        }
        if self.consonant_run < 3 {
            return Err(AppError::Config {
                message: format!(
                    "GIBBERISH_CONSONANT_RUN must be at least 3, got {}",
                    self.consonant_run
                ),
            });
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            vowel_ratio_threshold: 0.15,
            consonant_run: 6,
            gibberish_token_share: 0.5,
            concrete_idea_min_words: 4,
            extra_domain_keywords: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_default_is_valid() {
        assert!(ClassifierConfig::default().validate().is_ok());
    }

    #[test]
    fn test_classifier_config_rejects_vowel_ratio_out_of_range() {
        let config = ClassifierConfig {
            vowel_ratio_threshold: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GIBBERISH_VOWEL_RATIO"));
    }

    #[test]
    fn test_classifier_config_rejects_zero_token_share() {
        let config = ClassifierConfig {
            gibberish_token_share: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_classifier_config_rejects_short_consonant_run() {
        let config = ClassifierConfig {
            consonant_run: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_classifier_config_rejects_zero_min_words() {
        let config = ClassifierConfig {
            concrete_idea_min_words: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_default() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Pretty);
    }
}
