// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::sales::{ComputedLine, DetalleVenta, DetalleVentaView, Venta},
};

#[derive(Clone, Default)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_venta<'e, E>(
        &self,
        executor: E,
        almacen_id: Uuid,
        usuario_id: Uuid,
        total: Decimal,
    ) -> Result<Venta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venta = sqlx::query_as::<_, Venta>(
            r#"
            INSERT INTO ventas (almacen_id, usuario_id, total)
            VALUES ($1, $2, $3)
            RETURNING id, almacen_id, usuario_id, total, created_at
            "#,
        )
            .bind(almacen_id)
            .bind(usuario_id)
            .bind(total)
            .fetch_one(executor)
            .await?;
        Ok(venta)
    }

    // Inserção em massa das linhas usando UNNEST
    pub async fn insert_detalles<'e, E>(
        &self,
        executor: E,
        venta_id: Uuid,
        lines: &[ComputedLine],
    ) -> Result<Vec<DetalleVenta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let producto_ids: Vec<Uuid> = lines.iter().map(|l| l.producto_id).collect();
        let cantidades: Vec<Decimal> = lines.iter().map(|l| l.cantidad).collect();
        let precios: Vec<Decimal> = lines.iter().map(|l| l.precio_unitario).collect();
        let subtotales: Vec<Decimal> = lines.iter().map(|l| l.subtotal).collect();

        let detalles = sqlx::query_as::<_, DetalleVenta>(
            r#"
            INSERT INTO detalles_venta (venta_id, producto_id, cantidad, precio_unitario, subtotal)
            SELECT $1, *
            FROM unnest($2::uuid[], $3::numeric[], $4::numeric[], $5::numeric[])
            RETURNING id, venta_id, producto_id, cantidad, precio_unitario, subtotal
            "#,
        )
            .bind(venta_id)
            .bind(&producto_ids)
            .bind(&cantidades)
            .bind(&precios)
            .bind(&subtotales)
            .fetch_all(executor)
            .await?;
        Ok(detalles)
    }

    // Vendas mais recentes, opcionalmente limitadas a alguns almacenes
    pub async fn list_ventas<'e, E>(
        &self,
        executor: E,
        almacen_ids: Option<&[Uuid]>,
        limit: i64,
    ) -> Result<Vec<Venta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ventas = sqlx::query_as::<_, Venta>(
            r#"
            SELECT id, almacen_id, usuario_id, total, created_at
            FROM ventas
            WHERE ($1::uuid[] IS NULL OR almacen_id = ANY($1))
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
            .bind(almacen_ids)
            .bind(limit)
            .fetch_all(executor)
            .await?;
        Ok(ventas)
    }

    pub async fn find_venta<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Venta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venta = sqlx::query_as::<_, Venta>(
            "SELECT id, almacen_id, usuario_id, total, created_at FROM ventas WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(venta)
    }

    pub async fn detalles_for_venta<'e, E>(
        &self,
        executor: E,
        venta_id: Uuid,
    ) -> Result<Vec<DetalleVentaView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let detalles = sqlx::query_as::<_, DetalleVentaView>(
            r#"
            SELECT d.id, d.producto_id, p.nombre AS producto_nombre,
                   d.cantidad, d.precio_unitario, d.subtotal
            FROM detalles_venta d
            LEFT JOIN productos p ON p.id = d.producto_id
            WHERE d.venta_id = $1
            ORDER BY p.nombre ASC
            "#,
        )
            .bind(venta_id)
            .fetch_all(executor)
            .await?;
        Ok(detalles)
    }
}
