use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/library";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Process settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
}

impl Settings {
    /// Read DATABASE_URL, DATABASE_MAX_CONNECTIONS and PORT, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = parse_positive(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let port = parse_positive("PORT", lookup("PORT"), DEFAULT_PORT)?;

        Ok(Self {
            database_url,
            max_connections,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_positive<N>(name: &'static str, raw: Option<String>, default: N) -> Result<N, ConfigError>
where
    N: std::str::FromStr + PartialEq + From<u8>,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<N>() {
        Ok(n) if n != N::from(0) => Ok(n),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}
