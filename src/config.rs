// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    authz::{Gate, PlanCatalog},
    db::{EventRepository, GuestRepository, PgAuthzStore, RbacRepository, SupplierRepository, UserRepository},
    services::{AuthService, EventService, GuestService, MemberService, RbacService, SupplierService},
};

/// Settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub app_url: String,
    pub plan_catalog_path: Option<PathBuf>,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let app_url = env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let plan_catalog_path = env::var("PLAN_CATALOG_PATH").ok().map(PathBuf::from);
        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw}"))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            app_url,
            plan_catalog_path,
            db_max_connections,
        })
    }

    pub fn plan_catalog(&self) -> anyhow::Result<PlanCatalog> {
        match &self.plan_catalog_path {
            Some(path) => PlanCatalog::from_json_file(path),
            None => Ok(PlanCatalog::default()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub gate: Gate,
    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub member_service: MemberService,
    pub event_service: EventService,
    pub supplier_service: SupplierService,
    pub guest_service: GuestService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("connecting to the database")?;

        tracing::info!("✅ Database connection established");

        let plans = config.plan_catalog()?;
        Ok(Self::with_pool(db_pool, config, plans))
    }

    // --- Dependency graph ---
    pub fn with_pool(db_pool: PgPool, config: &AppConfig, plans: PlanCatalog) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());
        let supplier_repo = SupplierRepository::new(db_pool.clone());
        let guest_repo = GuestRepository::new(db_pool.clone());

        let gate = Gate::new(Arc::new(PgAuthzStore::new(db_pool.clone())), plans);

        let auth_service = AuthService::new(
            user_repo.clone(),
            rbac_repo.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let rbac_service = RbacService::new(rbac_repo.clone(), db_pool.clone());
        let member_service = MemberService::new(user_repo.clone(), rbac_repo, config.app_url.clone());
        let event_service = EventService::new(
            event_repo.clone(),
            user_repo,
            supplier_repo.clone(),
            guest_repo.clone(),
            db_pool.clone(),
        );
        let supplier_service = SupplierService::new(supplier_repo, db_pool.clone());
        let guest_service = GuestService::new(guest_repo, event_repo, config.app_url.clone());

        Self {
            db_pool,
            gate,
            auth_service,
            rbac_service,
            member_service,
            event_service,
            supplier_service,
            guest_service,
        }
    }
}
