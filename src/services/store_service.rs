// src/services/store_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StoreRepository,
    models::stores::{Almacen, StorePayload},
};

#[derive(Clone)]
pub struct StoreService {
    repo: StoreRepository,
}

impl StoreService {
    pub fn new(repo: StoreRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Almacen>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &StorePayload) -> Result<Almacen, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let store = self
            .repo
            .create(executor, payload.nombre.trim(), payload.direccion.as_deref())
            .await?;
        tracing::info!(almacen_id = %store.id, "🏬 Almacén criado: {}", store.nombre);
        Ok(store)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: &StorePayload) -> Result<Almacen, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update(executor, id, payload.nombre.trim(), payload.direccion.as_deref())
            .await?
            .ok_or(AppError::NotFound("Almacén".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if self.repo.delete(executor, id).await? == 0 {
            return Err(AppError::NotFound("Almacén".into()));
        }
        tracing::info!(almacen_id = %id, "Almacén removido");
        Ok(())
    }
}
