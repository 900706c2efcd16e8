// src/db/role_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::common::error::AppError;
use crate::models::users::{AppRole, NewUserRole, UserRole};

const ROLE_COLUMNS: &str = "id, user_id, role, almacen_id, created_at";

#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Vec<UserRole>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ROLE_COLUMNS} FROM user_roles WHERE user_id = $1 ORDER BY created_at ASC"
        );
        let roles = sqlx::query_as::<_, UserRole>(&sql)
            .bind(user_id)
            .fetch_all(executor)
            .await?;
        Ok(roles)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<UserRole>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM user_roles ORDER BY created_at ASC");
        let roles = sqlx::query_as::<_, UserRole>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(roles)
    }

    // Mesmo (usuário, cargo, almacén)? NULL conta como igual a NULL.
    pub async fn exists<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        role: AppRole,
        almacen_id: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_roles
                WHERE user_id = $1
                  AND role = $2
                  AND almacen_id IS NOT DISTINCT FROM $3
            )
            "#,
        )
            .bind(user_id)
            .bind(role)
            .bind(almacen_id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn insert<'e, E>(&self, executor: E, new_role: &NewUserRole) -> Result<UserRole, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO user_roles (user_id, role, almacen_id) VALUES ($1, $2, $3) RETURNING {ROLE_COLUMNS}"
        );
        sqlx::query_as::<_, UserRole>(&sql)
            .bind(new_role.user_id)
            .bind(new_role.role)
            .bind(new_role.almacen_id)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_unique(e, "O usuário já possui este cargo."))
    }

    // Inserção em massa de um cargo em vários almacenes (UNNEST)
    pub async fn insert_for_stores<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        role: AppRole,
        almacen_ids: &[Uuid],
    ) -> Result<Vec<UserRole>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO user_roles (user_id, role, almacen_id)
            SELECT $1, $2, unnest($3::uuid[])
            RETURNING {ROLE_COLUMNS}
            "#
        );
        let roles = sqlx::query_as::<_, UserRole>(&sql)
            .bind(user_id)
            .bind(role)
            .bind(almacen_ids)
            .fetch_all(executor)
            .await?;
        Ok(roles)
    }

    pub async fn delete_all_for_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id<'e, E>(&self, executor: E, user_id: Uuid, role_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM user_roles WHERE id = $1 AND user_id = $2")
            .bind(role_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Verificação de cargo fora do RLS (usada pelos guardiões)
    pub async fn user_has_any_role(&self, user_id: Uuid, roles: &[AppRole]) -> Result<bool, AppError> {
        let slugs: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role::text = ANY($2))",
        )
            .bind(user_id)
            .bind(&slugs)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
