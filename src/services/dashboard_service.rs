// src/services/dashboard_service.rs

use sqlx::{Executor, PgConnection, Postgres};
use crate::{
    common::error::AppError,
    db::{DashboardRepository, ProductRepository},
    models::dashboard::{DashboardSummary, SalesChartEntry, TopProductEntry},
    services::product_service::count_low_stock,
    utils::format::format_currency,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    product_repo: ProductRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, product_repo: ProductRepository) -> Self {
        Self { repo, product_repo }
    }

    pub async fn get_summary(&self, conn: &mut PgConnection) -> Result<DashboardSummary, AppError> {

        let counts = self.repo.get_summary_counts(&mut *conn).await?;

        // Estoque baixo sai da mesma agregação usada na listagem de produtos
        let products = self.product_repo.list(&mut *conn).await?;
        let inventory = self.product_repo.list_inventory(&mut *conn).await?;

        Ok(DashboardSummary {
            ventas_hoy_formateado: format_currency(counts.ventas_hoy),
            ventas_hoy: counts.ventas_hoy,
            cantidad_ventas_hoy: counts.cantidad_ventas_hoy,
            total_productos: counts.total_productos,
            productos_stock_bajo: count_low_stock(&products, &inventory),
            total_almacenes: counts.total_almacenes,
        })
    }

    pub async fn get_sales_chart<'e, E>(&self, executor: E) -> Result<Vec<SalesChartEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get_sales_last_30_days(executor).await
    }

    pub async fn get_top_products<'e, E>(&self, executor: E) -> Result<Vec<TopProductEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get_top_products(executor).await
    }
}
