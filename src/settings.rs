use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_bool_from_anything, deserialize_number_from_string,
    deserialize_vec_from_string_or_vec,
};

pub const DEFAULT_CONFIG_FILE: &str = "configuration.toml";

/// Runtime configuration.
///
/// Layered from built-in defaults, an optional TOML file (`configuration.toml`
/// or the path in `TRIVIA_CONFIG`) and `TRIVIA__SECTION__KEY` environment
/// variables, in that order.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub pagination: PaginationSettings,
    pub quiz: QuizSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite file, or `:memory:`.
    pub path: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSettings {
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub randomize: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    // env vars carry a comma separated list
    #[serde(deserialize_with = "deserialize_vec_from_string_or_vec")]
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let file = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        Self::builder()?
            .add_source(File::with_name(&file).required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults only, no file or environment lookup.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "trivia.db")?
            .set_default("database.max_connections", 5)?
            .set_default("pagination.page_size", 10)?
            .set_default("quiz.randomize", false)?
            .set_default("cors.allowed_origins", vec!["*"])
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
