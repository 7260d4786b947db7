use clap::Parser;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "static";

/// Converter web service.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "server", version)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory the front-end is served from
    #[arg(long, env = "STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::parse_from([
            "server",
            "--host",
            "127.0.0.1",
            "--port",
            "3000",
            "--static-dir",
            "public",
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn default_binds_all_interfaces() {
        assert_eq!(ServerConfig::default().bind_addr(), "0.0.0.0:8080");
    }
}
