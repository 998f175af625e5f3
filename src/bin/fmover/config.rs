use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Local};
use itertools::Itertools;
use serde::Deserialize;

use fiscal_mover::{normalize, print_error};

use crate::Args;

const DEFAULT_EXTENSIONS: [&str; 5] = ["pdf", "xml", "txt", "xlsx", "xls"];
const DEFAULT_GENERIC_WORDS: [&str; 8] = ["LTDA", "SA", "S.A.", "ME", "MEI", "EPP", "EIRELI", "CIA"];
const DEFAULT_BUCKET_LABEL: &str = "PRESTADOS";
const DEFAULT_ALTERNATE_LABEL: &str = "TOMADOS";
const DEFAULT_SUBFOLDER_LABELS: [&str; 2] = ["ENTRADA", "SAIDA"];

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) source: Option<PathBuf>,
    pub(crate) dest: Option<PathBuf>,
    pub(crate) auto: bool,
    pub(crate) debug: bool,
    pub(crate) dryrun: bool,
    pub(crate) verbose: bool,
    pub(crate) extensions: Vec<String>,
    pub(crate) generic_words: Vec<String>,
    pub(crate) bucket_label: String,
    pub(crate) alternate_label: String,
    pub(crate) subfolder_labels: Vec<String>,
    pub(crate) year_marker: String,
    pub(crate) month_marker: String,
    pub(crate) subfolder_mode: bool,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct FmoverConfig {
    #[serde(default)]
    source: Option<PathBuf>,
    #[serde(default)]
    dest: Option<PathBuf>,
    #[serde(default)]
    auto: bool,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    generic_words: Vec<String>,
    #[serde(default)]
    bucket_label: Option<String>,
    #[serde(default)]
    alternate_label: Option<String>,
    #[serde(default)]
    subfolder_labels: Vec<String>,
    #[serde(default)]
    year_marker: Option<String>,
    #[serde(default)]
    month_marker: Option<String>,
    #[serde(default)]
    subfolder_mode: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    fmover: FmoverConfig,
}

impl FmoverConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> Self {
        fiscal_mover::config::CONFIG_PATH
            .as_deref()
            .and_then(|path| {
                fs::read_to_string(path)
                    .map_err(|e| {
                        print_error!("Error reading config file {}: {e}", path.display());
                    })
                    .ok()
            })
            .and_then(|config_string| Self::from_toml_str(&config_string).ok())
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.fmover)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: Args) -> Self {
        let user_config = FmoverConfig::get_user_config();
        Self::merge(args, user_config)
    }

    fn merge(args: Args, user_config: FmoverConfig) -> Self {
        let now = Local::now();

        let base_extensions = if user_config.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
        } else {
            user_config.extensions
        };
        let extensions: Vec<String> = base_extensions
            .into_iter()
            .chain(args.extensions)
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .unique()
            .collect();

        let generic_words = if user_config.generic_words.is_empty() {
            DEFAULT_GENERIC_WORDS.iter().map(ToString::to_string).collect()
        } else {
            user_config.generic_words
        };

        let subfolder_labels = if user_config.subfolder_labels.is_empty() {
            DEFAULT_SUBFOLDER_LABELS.iter().map(ToString::to_string).collect()
        } else {
            user_config.subfolder_labels
        };

        Self {
            source: args.source.or(user_config.source),
            dest: args.dest.or(user_config.dest),
            auto: args.auto || user_config.auto,
            debug: args.debug || user_config.debug,
            dryrun: args.print || user_config.dryrun,
            verbose: args.verbose || user_config.verbose,
            extensions,
            generic_words,
            bucket_label: user_config.bucket_label.unwrap_or_else(|| DEFAULT_BUCKET_LABEL.to_string()),
            alternate_label: user_config
                .alternate_label
                .unwrap_or_else(|| DEFAULT_ALTERNATE_LABEL.to_string()),
            subfolder_labels,
            year_marker: user_config.year_marker.unwrap_or_else(|| now.year().to_string()),
            month_marker: user_config
                .month_marker
                .unwrap_or_else(|| format!("{:02}-{}", now.month(), now.year())),
            subfolder_mode: args.subfolders || user_config.subfolder_mode,
        }
    }

    /// Normalized generic word set used by the resolver.
    pub fn generic_word_set(&self) -> BTreeSet<String> {
        self.generic_words.iter().map(|word| normalize(word)).collect()
    }

    /// Normalized subfolder names that qualify for subfolder mode moves.
    pub fn subfolder_label_set(&self) -> BTreeSet<String> {
        self.subfolder_labels.iter().map(|label| normalize(label)).collect()
    }

    /// Normalized subfolder name variants replaced at the destination,
    /// including the plural spellings.
    pub fn subfolder_variant_set(&self) -> BTreeSet<String> {
        self.subfolder_labels
            .iter()
            .flat_map(|label| {
                let normalized = normalize(label);
                let plural = format!("{normalized}S");
                [normalized, plural]
            })
            .collect()
    }
}
