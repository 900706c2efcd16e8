// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// 1. Resumo do Dia (Os Cards do Topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub ventas_hoy: Decimal,          // Total vendido hoje
    #[schema(example = "$1,250.00")]
    pub ventas_hoy_formateado: String,
    pub cantidad_ventas_hoy: i64,     // Número de tickets hoje
    pub total_productos: i64,
    pub productos_stock_bajo: i64,    // Sem estoque ou abaixo do mínimo
    pub total_almacenes: i64,
}

// 2. Gráfico de Vendas (Últimos 30 dias)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesChartEntry {
    pub date: Option<String>, // YYYY-MM-DD
    pub total: Option<Decimal>,
}

// 3. Top produtos por faturamento
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub producto_nombre: String,
    pub total_cantidad: Option<Decimal>,
    pub total_ingresos: Option<Decimal>,
}
