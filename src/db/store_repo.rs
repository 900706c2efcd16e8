// src/db/store_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{common::error::AppError, models::stores::Almacen};

// Só roda no executor recebido (conexão RLS do request)
#[derive(Clone, Default)]
pub struct StoreRepository;

impl StoreRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Almacen>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stores = sqlx::query_as::<_, Almacen>(
            "SELECT id, nombre, direccion, created_at FROM almacenes ORDER BY nombre ASC",
        )
            .fetch_all(executor)
            .await?;
        Ok(stores)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Almacen>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let store = sqlx::query_as::<_, Almacen>(
            "SELECT id, nombre, direccion, created_at FROM almacenes WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(store)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        nombre: &str,
        direccion: Option<&str>,
    ) -> Result<Almacen, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Almacen>(
            r#"
            INSERT INTO almacenes (nombre, direccion)
            VALUES ($1, $2)
            RETURNING id, nombre, direccion, created_at
            "#,
        )
            .bind(nombre)
            .bind(direccion)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_unique(e, "Já existe um almacén com esse nome."))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nombre: &str,
        direccion: Option<&str>,
    ) -> Result<Option<Almacen>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Almacen>(
            r#"
            UPDATE almacenes SET nombre = $2, direccion = $3
            WHERE id = $1
            RETURNING id, nombre, direccion, created_at
            "#,
        )
            .bind(id)
            .bind(nombre)
            .bind(direccion)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::from_unique(e, "Já existe um almacén com esse nome."))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM almacenes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
