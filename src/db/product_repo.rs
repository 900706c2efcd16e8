// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::products::{InventoryRow, ProductPayload, Producto},
};

const PRODUCT_COLUMNS: &str =
    "id, nombre, categoria, unidad, precio_venta, precio_compra, stock_minimo, stock_maximo, created_at";

// Só roda no executor recebido (conexão RLS do request)
#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Catálogo
    // ---

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM productos ORDER BY nombre ASC");
        let products = sqlx::query_as::<_, Producto>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM productos WHERE id = $1");
        let product = sqlx::query_as::<_, Producto>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &ProductPayload) -> Result<Producto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO productos
                (nombre, categoria, unidad, precio_venta, precio_compra, stock_minimo, stock_maximo)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Producto>(&sql)
            .bind(&payload.nombre)
            .bind(payload.categoria.as_deref())
            .bind(&payload.unidad)
            .bind(payload.precio_venta)
            .bind(payload.precio_compra)
            .bind(payload.stock_minimo)
            .bind(payload.stock_maximo)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_unique(e, "Já existe um produto com esse nome."))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ProductPayload,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE productos SET
                nombre = $2, categoria = $3, unidad = $4, precio_venta = $5,
                precio_compra = $6, stock_minimo = $7, stock_maximo = $8
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Producto>(&sql)
            .bind(id)
            .bind(&payload.nombre)
            .bind(payload.categoria.as_deref())
            .bind(&payload.unidad)
            .bind(payload.precio_venta)
            .bind(payload.precio_compra)
            .bind(payload.stock_minimo)
            .bind(payload.stock_maximo)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_unique(e, "Já existe um produto com esse nome."))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Inventário (saldo por almacén)
    // ---

    pub async fn list_inventory<'e, E>(&self, executor: E) -> Result<Vec<InventoryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, InventoryRow>(
            "SELECT producto_id, almacen_id, cantidad FROM inventario",
        )
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn inventory_for_product<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
    ) -> Result<Vec<InventoryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, InventoryRow>(
            "SELECT producto_id, almacen_id, cantidad FROM inventario WHERE producto_id = $1",
        )
            .bind(producto_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // Upsert do saldo de um produto em um almacén
    pub async fn set_stock<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        almacen_id: Uuid,
        cantidad: Decimal,
    ) -> Result<InventoryRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            INSERT INTO inventario (producto_id, almacen_id, cantidad)
            VALUES ($1, $2, $3)
            ON CONFLICT (producto_id, almacen_id)
            DO UPDATE SET cantidad = EXCLUDED.cantidad
            RETURNING producto_id, almacen_id, cantidad
            "#,
        )
            .bind(producto_id)
            .bind(almacen_id)
            .bind(cantidad)
            .fetch_one(executor)
            .await?;
        Ok(row)
    }

    // Trava a linha de saldo até o fim da transação
    pub async fn get_stock_for_update<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        almacen_id: Uuid,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cantidad = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT cantidad FROM inventario
            WHERE producto_id = $1 AND almacen_id = $2
            FOR UPDATE
            "#,
        )
            .bind(producto_id)
            .bind(almacen_id)
            .fetch_optional(executor)
            .await?;
        Ok(cantidad)
    }

    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        producto_id: Uuid,
        almacen_id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE inventario SET cantidad = cantidad + $3
            WHERE producto_id = $1 AND almacen_id = $2
            "#,
        )
            .bind(producto_id)
            .bind(almacen_id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }
}
