// src/services/sales_service.rs

use rust_decimal::Decimal;
use sqlx::{Connection, PgConnection};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, SalesRepository},
    models::sales::{ComputedLine, CreateSalePayload, SaleLinePayload, SalesQuery, Venta, VentaDetail},
    utils::{format::format_currency, stock::StoreVisibility},
};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Calcula subtotal de cada linha (quantidade × preço, 2 casas) e o total da venda.
pub fn compute_lines(items: &[SaleLinePayload]) -> Result<(Vec<ComputedLine>, Decimal), AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest("A venda precisa de ao menos um item.".into()));
    }

    let mut total = Decimal::ZERO;
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        if item.cantidad <= Decimal::ZERO || item.precio_unitario < Decimal::ZERO {
            return Err(AppError::BadRequest("Quantidade ou preço inválido.".into()));
        }
        let subtotal = (item.cantidad * item.precio_unitario).round_dp(2);
        total += subtotal;
        lines.push(ComputedLine {
            producto_id: item.producto_id,
            cantidad: item.cantidad,
            precio_unitario: item.precio_unitario,
            subtotal,
        });
    }

    Ok((lines, total))
}

// Quantidade total por produto (o mesmo produto pode aparecer em várias linhas).
// BTreeMap: as travas de saldo são sempre pegas na mesma ordem.
pub fn required_per_product(lines: &[ComputedLine]) -> BTreeMap<Uuid, Decimal> {
    let mut required = BTreeMap::new();
    for line in lines {
        *required.entry(line.producto_id).or_insert(Decimal::ZERO) += line.cantidad;
    }
    required
}

// Quais almacenes entram na consulta de vendas (None = todos)
pub fn sales_scope(visibility: &StoreVisibility, almacen_id: Option<Uuid>) -> Option<Vec<Uuid>> {
    match (almacen_id, visibility) {
        (Some(id), v) if v.allows(id) => Some(vec![id]),
        (Some(_), _) => Some(Vec::new()),
        (None, StoreVisibility::All) => None,
        (None, StoreVisibility::Only(stores)) => Some(stores.iter().copied().collect()),
    }
}

#[derive(Clone)]
pub struct SalesService {
    repo: SalesRepository,
    product_repo: ProductRepository,
}

impl SalesService {
    pub fn new(repo: SalesRepository, product_repo: ProductRepository) -> Self {
        Self { repo, product_repo }
    }

    // --- VENDA: grava cabeçalho + linhas e baixa o estoque do almacén ---
    pub async fn create_sale(
        &self,
        conn: &mut PgConnection,
        usuario_id: Uuid,
        sell_scope: &StoreVisibility,
        payload: &CreateSalePayload,
    ) -> Result<VentaDetail, AppError> {
        if !sell_scope.allows(payload.almacen_id) {
            return Err(AppError::Forbidden("Você não pode vender neste almacén.".into()));
        }

        let (lines, total) = compute_lines(&payload.items)?;
        let mut tx = conn.begin().await?;

        // 1. Valida saldo de cada produto (com trava)
        for (producto_id, required) in required_per_product(&lines) {
            let available = self
                .product_repo
                .get_stock_for_update(&mut *tx, producto_id, payload.almacen_id)
                .await?
                .unwrap_or(Decimal::ZERO);

            if available < required {
                return Err(AppError::InsufficientStock(format!(
                    "Estoque insuficiente para o produto {} (disponível: {}, pedido: {}).",
                    producto_id, available, required
                )));
            }

            // 2. Baixa o saldo
            self.product_repo
                .adjust_stock(&mut *tx, producto_id, payload.almacen_id, -required)
                .await?;
        }

        // 3. Cabeçalho e linhas
        let venta = self
            .repo
            .create_venta(&mut *tx, payload.almacen_id, usuario_id, total)
            .await?;
        self.repo.insert_detalles(&mut *tx, venta.id, &lines).await?;
        let detalles = self.repo.detalles_for_venta(&mut *tx, venta.id).await?;

        tx.commit().await?;

        tracing::info!(
            venta_id = %venta.id,
            almacen_id = %venta.almacen_id,
            %total,
            lineas = lines.len(),
            "🧾 Venda registrada"
        );

        Ok(VentaDetail {
            total_formateado: format_currency(venta.total),
            venta,
            detalles,
        })
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        visibility: &StoreVisibility,
        query: &SalesQuery,
    ) -> Result<Vec<Venta>, AppError> {
        let scope = sales_scope(visibility, query.almacen_id);
        if matches!(&scope, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.repo.list_ventas(&mut *conn, scope.as_deref(), limit).await
    }

    pub async fn get(&self, conn: &mut PgConnection, id: Uuid, visibility: &StoreVisibility) -> Result<VentaDetail, AppError> {

        let venta = self
            .repo
            .find_venta(&mut *conn, id)
            .await?
            .filter(|v| visibility.allows(v.almacen_id))
            .ok_or(AppError::NotFound("Venda".into()))?;
        let detalles = self.repo.detalles_for_venta(&mut *conn, id).await?;

        Ok(VentaDetail {
            total_formateado: format_currency(venta.total),
            venta,
            detalles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn line(producto_id: Uuid, cantidad: &str, precio: &str) -> SaleLinePayload {
        SaleLinePayload {
            producto_id,
            cantidad: Decimal::from_str(cantidad).unwrap(),
            precio_unitario: Decimal::from_str(precio).unwrap(),
        }
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let (lines, total) = compute_lines(&[line(p1, "2", "4.50"), line(p2, "0.333", "3")]).unwrap();

        assert_eq!(lines[0].subtotal, Decimal::from_str("9.00").unwrap());
        assert_eq!(lines[1].subtotal, Decimal::from_str("1.00").unwrap());
        assert_eq!(total, Decimal::from_str("10.00").unwrap());
        assert_eq!(total, lines.iter().map(|l| l.subtotal).sum::<Decimal>());
    }

    #[test]
    fn test_invalid_lines_are_rejected() {
        assert!(compute_lines(&[]).is_err());
        assert!(compute_lines(&[line(Uuid::new_v4(), "0", "1")]).is_err());
        assert!(compute_lines(&[line(Uuid::new_v4(), "1", "-1")]).is_err());
    }

    #[test]
    fn test_required_per_product_merges_lines() {
        let p = Uuid::new_v4();
        let (lines, _) = compute_lines(&[line(p, "2", "1"), line(p, "3", "1")]).unwrap();
        let required = required_per_product(&lines);
        assert_eq!(required.len(), 1);
        assert_eq!(required[&p], Decimal::from(5));
    }

    #[test]
    fn test_sales_scope() {
        let store = Uuid::new_v4();
        let only = StoreVisibility::Only(HashSet::from([store]));

        assert_eq!(sales_scope(&StoreVisibility::All, None), None);
        assert_eq!(sales_scope(&only, None), Some(vec![store]));
        assert_eq!(sales_scope(&only, Some(store)), Some(vec![store]));
        assert_eq!(sales_scope(&only, Some(Uuid::new_v4())), Some(Vec::new()));
    }
}
