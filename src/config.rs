// src/config.rs

use crate::{
    db::{DashboardRepository, ProductRepository, RoleRepository, SalesRepository, StoreRepository, UserRepository},
    services::{
        auth_admin::{AuthAdmin, GoTrueAdmin},
        DashboardService, ProductService, RoleService, SalesService, StoreService, UserService,
    },
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

// Configuração lida do ambiente (.env é opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub supabase_url: String,
    pub service_role_key: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .context("SUPABASE_JWT_SECRET deve ser definido")?,
            supabase_url: env::var("SUPABASE_URL").context("SUPABASE_URL deve ser definida")?,
            service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .context("SUPABASE_SERVICE_ROLE_KEY deve ser definida")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_admin: Arc<dyn AuthAdmin>,

    pub user_service: UserService,
    pub role_service: RoleService,
    pub store_service: StoreService,
    pub product_service: ProductService,
    pub sales_service: SalesService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let auth_admin = GoTrueAdmin::new(&config.supabase_url, &config.service_role_key)?;

        Ok(Self::build(db_pool, config.jwt_secret.clone(), Arc::new(auth_admin)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn build(db_pool: PgPool, jwt_secret: String, auth_admin: Arc<dyn AuthAdmin>) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let role_repo = RoleRepository::new(db_pool.clone());
        let store_repo = StoreRepository::new();
        let product_repo = ProductRepository::new();
        let sales_repo = SalesRepository::new();
        let dashboard_repo = DashboardRepository::new();

        Self {
            user_service: UserService::new(user_repo, role_repo.clone(), store_repo.clone()),
            role_service: RoleService::new(role_repo),
            store_service: StoreService::new(store_repo.clone()),
            product_service: ProductService::new(product_repo.clone(), store_repo),
            sales_service: SalesService::new(sales_repo, product_repo.clone()),
            dashboard_service: DashboardService::new(dashboard_repo, product_repo),
            db_pool,
            jwt_secret,
            auth_admin,
        }
    }
}
