// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    db::Store,
    services::{
        analytics_service::AnalyticsService, catalog_service::CatalogService,
        dashboard_service::DashboardService, sale_service::SaleService,
    },
};

/// Process configuration, read from the environment (and `.env`, loaded in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().context("DB_MAX_CONNECTIONS must be a positive integer")?,
            Err(_) => 5,
        };
        let acquire_timeout_secs: u64 = match env::var("DB_ACQUIRE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().context("DB_ACQUIRE_TIMEOUT_SECS must be a positive integer")?,
            Err(_) => 3,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Closed by the binary on shutdown.
    pub store: Arc<dyn Store>,
    pub catalog_service: CatalogService,
    pub sale_service: SaleService,
    pub analytics_service: AnalyticsService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Wires every service to the same store handle.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            catalog_service: CatalogService::new(store.clone()),
            sale_service: SaleService::new(store.clone()),
            analytics_service: AnalyticsService::new(store.clone()),
            dashboard_service: DashboardService::new(store.clone()),
            store,
        }
    }
}
