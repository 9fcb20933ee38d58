use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::optimizer::{DispatchSettings, StrategyKind};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            enable_cors: true,
            cors_origins: vec![
                "http://127.0.0.1:5500".to_string(),
                "http://localhost:5500".to_string(),
            ],
            request_timeout_secs: 10,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    pub strategy: StrategyKind,
    pub co2_emission_factor: f64,
    pub residual_tolerance: f64,
    /// Answer 422 instead of a best-effort plan when the load cannot be met
    pub reject_infeasible: bool,
    pub exhaustive_max_units: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let settings = DispatchSettings::default();
        Self {
            strategy: StrategyKind::default(),
            co2_emission_factor: settings.co2_emission_factor,
            residual_tolerance: settings.residual_tolerance,
            reject_infeasible: true,
            exhaustive_max_units: settings.exhaustive_max_units,
        }
    }
}

impl DispatchConfig {
    pub fn settings(&self) -> DispatchSettings {
        DispatchSettings {
            co2_emission_factor: self.co2_emission_factor,
            residual_tolerance: self.residual_tolerance,
            exhaustive_max_units: self.exhaustive_max_units,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Self::figment_with("config/default.toml")
    }

    /// Defaults, then the given TOML file, then `PLANNER__` environment variables
    pub fn figment_with(path: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PLANNER__").split("__"))
    }
}
