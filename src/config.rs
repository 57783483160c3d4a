use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the server keeps its records in memory.
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let host: IpAddr = env_or("PONTO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PONTO_HOST: {e}"))?;

        let port: u16 = env_or("PONTO_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid PONTO_PORT: {e}"))?;

        let max_body_size: usize = env_or("PONTO_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid PONTO_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("PONTO_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            max_body_size,
            log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            max_body_size: 65536,
            log_level: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
