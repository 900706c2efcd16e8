// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use crate::{
    common::error::AppError,
    models::dashboard::{SalesChartEntry, TopProductEntry},
};

// Totais brutos dos cards do topo
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCounts {
    pub ventas_hoy: Decimal,
    pub cantidad_ventas_hoy: i64,
    pub total_productos: i64,
    pub total_almacenes: i64,
}

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Resumo Geral (uma única consulta = snapshot consistente)
    pub async fn get_summary_counts<'e, E>(&self, executor: E) -> Result<SummaryCounts, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (ventas_hoy, cantidad_ventas_hoy, total_productos, total_almacenes) =
            sqlx::query_as::<_, (Decimal, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COALESCE(SUM(total), 0) FROM ventas WHERE created_at::date = CURRENT_DATE),
                    (SELECT COUNT(*) FROM ventas WHERE created_at::date = CURRENT_DATE),
                    (SELECT COUNT(*) FROM productos),
                    (SELECT COUNT(*) FROM almacenes)
                "#,
            )
                .fetch_one(executor)
                .await?;

        Ok(SummaryCounts {
            ventas_hoy,
            cantidad_ventas_hoy,
            total_productos,
            total_almacenes,
        })
    }

    // 2. Gráfico de Linha (Últimos 30 dias)
    pub async fn get_sales_last_30_days<'e, E>(&self, executor: E) -> Result<Vec<SalesChartEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, SalesChartEntry>(
            r#"
            SELECT
                to_char(created_at, 'YYYY-MM-DD') AS "date",
                SUM(total) AS "total"
            FROM ventas
            WHERE created_at >= (CURRENT_DATE - INTERVAL '30 days')
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
            .fetch_all(executor)
            .await?;
        Ok(data)
    }

    // 3. Top 5 produtos por faturamento
    pub async fn get_top_products<'e, E>(&self, executor: E) -> Result<Vec<TopProductEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, TopProductEntry>(
            r#"
            SELECT
                p.nombre AS producto_nombre,
                SUM(d.cantidad) AS total_cantidad,
                SUM(d.subtotal) AS total_ingresos
            FROM detalles_venta d
            JOIN productos p ON d.producto_id = p.id
            GROUP BY p.id, p.nombre
            ORDER BY total_ingresos DESC
            LIMIT 5
            "#,
        )
            .fetch_all(executor)
            .await?;
        Ok(data)
    }
}
