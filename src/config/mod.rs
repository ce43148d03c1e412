//! Configuration management.
//!
//! Settings come from an optional TOML file, then `MANUBOT_CATALOG__*`
//! environment variables (sections separated by `__`), then CLI flags.
//!
//! ```toml
//! catalog_path = "catalog.yml"
//! output_path = "output/catalog.json"
//! authors_max_length = 100
//!
//! [schema]
//! manuscript_url = "html_url"
//! repository_url = "repo_url"
//! thumbnail_url = "thumbnail_url"
//! citation_suffix = "_citation"
//! publication_types = ["preprint", "journal"]
//! prefer_explicit_url = true
//!
//! [http]
//! timeout_secs = 30
//!
//! [resolvers]
//! doi_base_url = "https://doi.org"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "manubot-catalog.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "MANUBOT_CATALOG";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YAML catalog to read
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// JSON catalog to write
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Character budget for the author summary before "et al"
    #[serde(default = "default_authors_max_length")]
    pub authors_max_length: usize,

    /// Field names of input records
    #[serde(default)]
    pub schema: SchemaConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Citation resolver endpoints
    #[serde(default)]
    pub resolvers: ResolverConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            output_path: default_output_path(),
            authors_max_length: default_authors_max_length(),
            schema: SchemaConfig::default(),
            http: HttpConfig::default(),
            resolvers: ResolverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.yml")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output").join("catalog.json")
}

fn default_authors_max_length() -> usize {
    crate::fields::DEFAULT_AUTHORS_MAX_LENGTH
}

/// Field-name mapping for catalog records.
///
/// The catalog variants in the wild differ only in these names, e.g.
/// `manuscript_url`/`repository_url` instead of `html_url`/`repo_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Field holding the rendered manuscript URL
    #[serde(default = "default_manuscript_url")]
    pub manuscript_url: String,

    /// Field holding the source repository URL
    #[serde(default = "default_repository_url")]
    pub repository_url: String,

    /// Field holding a precomputed thumbnail URL
    #[serde(default = "default_thumbnail_url")]
    pub thumbnail_url: String,

    /// Suffix appended to a publication type to name its citation field
    #[serde(default = "default_citation_suffix")]
    pub citation_suffix: String,

    /// Publication types, in output order
    #[serde(default = "default_publication_types")]
    pub publication_types: Vec<String>,

    /// Keep an explicitly known URL over the one the resolver returns
    #[serde(default = "default_true")]
    pub prefer_explicit_url: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            manuscript_url: default_manuscript_url(),
            repository_url: default_repository_url(),
            thumbnail_url: default_thumbnail_url(),
            citation_suffix: default_citation_suffix(),
            publication_types: default_publication_types(),
            prefer_explicit_url: true,
        }
    }
}

impl SchemaConfig {
    /// Name of the citation field for a publication type
    pub fn citation_field(&self, publication_type: &str) -> String {
        format!("{}{}", publication_type, self.citation_suffix)
    }
}

fn default_manuscript_url() -> String {
    "html_url".to_string()
}

fn default_repository_url() -> String {
    "repo_url".to_string()
}

fn default_thumbnail_url() -> String {
    "thumbnail_url".to_string()
}

fn default_citation_suffix() -> String {
    "_citation".to_string()
}

fn default_publication_types() -> Vec<String> {
    vec!["preprint".to_string(), "journal".to_string()]
}

fn default_true() -> bool {
    true
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Base URLs of the metadata services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// DOI content negotiation endpoint
    #[serde(default = "default_doi_base_url")]
    pub doi_base_url: String,

    /// NCBI API host serving the literature citation exporter
    #[serde(default = "default_ncbi_base_url")]
    pub ncbi_base_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            doi_base_url: default_doi_base_url(),
            ncbi_base_url: default_ncbi_base_url(),
        }
    }
}

fn default_doi_base_url() -> String {
    "https://doi.org".to_string()
}

fn default_ncbi_base_url() -> String {
    "https://api.ncbi.nlm.nih.gov".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("schema.publication_types"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Look for [`CONFIG_FILE_NAME`] in the working directory
pub fn find_config_file() -> Option<PathBuf> {
    let candidate = PathBuf::from(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}
