use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};

use database::embedded::EmbeddedConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: EmbeddedConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = EmbeddedConfig::from_env()?; // DATABASE_PATH is required
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_database_path() {
        temp_env::with_var_unset("DATABASE_PATH", || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_PATH"));
        });
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("DATABASE_PATH", Some("/tmp/users.redb")),
                ("PORT", Some("9090")),
                ("APP_ENV", Some("production")),
                ("DB_OPEN_MAX_RETRIES", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "users_api");
                assert_eq!(config.database.path(), std::path::Path::new("/tmp/users.redb"));
                assert_eq!(config.database.open_max_retries, 3);
                assert_eq!(config.server.port, 9090);
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_config_rejects_bad_port() {
        temp_env::with_vars(
            [("DATABASE_PATH", Some("/tmp/users.redb")), ("PORT", Some("http"))],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("PORT"));
            },
        );
    }
}
