use std::env;
use std::str::FromStr;
use anyhow::{Context, Result};

/// Where posts are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spanner" => Ok(StoreBackend::Spanner),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!(
                "STORE_BACKEND must be one of: spanner, memory, got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
    pub post_table: String,
}

impl SpannerConfig {
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Present only when `store_backend` is `Spanner`
    pub spanner: Option<SpannerConfig>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = lookup("STORE_BACKEND")
            .unwrap_or_else(|| "spanner".to_string())
            .parse::<StoreBackend>()?;

        let spanner = match store_backend {
            StoreBackend::Spanner => Some(spanner_from_lookup(&lookup)?),
            StoreBackend::Memory => None,
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store_backend,
            spanner,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {:?}", self.store_backend);
        if let Some(spanner) = &self.spanner {
            tracing::info!("  Spanner emulator: {}",
                spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner project: {}", spanner.project);
            tracing::info!("  Spanner instance: {}", spanner.instance);
            tracing::info!("  Spanner database: {}", spanner.database);
            tracing::info!("  Post table: {}", spanner.post_table);
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn spanner_from_lookup<F>(lookup: &F) -> Result<SpannerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let emulator_host = lookup("SPANNER_EMULATOR_HOST");

    let project = lookup("SPANNER_PROJECT")
        .context("SPANNER_PROJECT environment variable is required")?;

    let instance = lookup("SPANNER_INSTANCE")
        .context("SPANNER_INSTANCE environment variable is required")?;

    let database = lookup("SPANNER_DATABASE")
        .context("SPANNER_DATABASE environment variable is required")?;

    let post_table = lookup("SPANNER_POST_TABLE")
        .unwrap_or_else(|| "posts".to_string());

    // The table name is interpolated into SQL and DDL
    let valid_table = post_table
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && post_table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_table {
        anyhow::bail!(
            "SPANNER_POST_TABLE must start with a letter and contain only letters, digits and '_', got '{}'",
            post_table
        );
    }

    Ok(SpannerConfig {
        emulator_host,
        project,
        instance,
        database,
        post_table,
    })
}
