// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{common::error::AppError, models::users::Profile};

// Repositório da tabela `profiles` (+ consultas privilegiadas em `auth.users`)
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, email, full_name, created_at FROM profiles WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(profile)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT id, email, full_name, created_at FROM profiles ORDER BY email ASC",
        )
            .fetch_all(executor)
            .await?;
        Ok(profiles)
    }

    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, full_name, created_at
            "#,
        )
            .bind(id)
            .bind(email)
            .bind(full_name)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_unique(e, "Já existe um perfil para este usuário."))
    }

    pub async fn delete_profile<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Consulta privilegiada: usa a pool de serviço, fora do RLS.
    pub async fn find_auth_user_id_by_email(&self, email: &str) -> Result<Option<Uuid>, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM auth.users WHERE lower(email) = lower($1) LIMIT 1",
        )
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
