use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::geometry::{DistanceMetric, ScoreNormalization};
use crate::pipeline::GeometryOptions;
use crate::text::TokenizerConfig;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// variable has a default; an unrecognized value is an error rather than a
/// silent fallback, since it would change every score.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one `<id>.txt` per publication
    pub data_dir: PathBuf,
    /// Citation network file (`citing<TAB>cited` per line)
    pub citations_path: PathBuf,
    pub stemming: bool,
    pub stopwords: bool,
    pub normalization: ScoreNormalization,
    pub fallback: DistanceMetric,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("CONTRIBUTION_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./test_data"));

        // A relative citations path is taken relative to the data directory
        let citations = env::var("CONTRIBUTION_CITATIONS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("citations.tsv"));
        let citations_path = if citations.is_absolute() {
            citations
        } else {
            data_dir.join(citations)
        };

        Ok(Self {
            data_dir,
            citations_path,
            stemming: parse_var("CONTRIBUTION_STEMMING", true, parse_bool)?,
            stopwords: parse_var("CONTRIBUTION_STOPWORDS", true, |v| match v {
                "english" => Some(true),
                "none" => Some(false),
                _ => None,
            })?,
            normalization: parse_var("CONTRIBUTION_NORMALIZATION", ScoreNormalization::Normalized, |v| {
                match v {
                    "raw" => Some(ScoreNormalization::Raw),
                    "normalized" => Some(ScoreNormalization::Normalized),
                    _ => None,
                }
            })?,
            fallback: parse_var("CONTRIBUTION_FALLBACK", DistanceMetric::Euclidean, |v| match v {
                "euclidean" => Some(DistanceMetric::Euclidean),
                "cosine" => Some(DistanceMetric::Cosine),
                _ => None,
            })?,
        })
    }

    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig {
            stemming: self.stemming,
            stopwords: self.stopwords.then(TokenizerConfig::english_stopwords),
            ..TokenizerConfig::default()
        }
    }

    pub fn geometry_options(&self) -> GeometryOptions {
        GeometryOptions {
            fallback: self.fallback,
            normalization: self.normalization,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read `name`, falling back to `default` when unset. Values are matched
/// case-insensitively after trimming.
fn parse_var<T>(name: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw.trim().to_lowercase();
            parse(&value).ok_or_else(|| anyhow::anyhow!("{name} has unrecognized value '{raw}'"))
        }
        Err(_) => Ok(default),
    }
}
