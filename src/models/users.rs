// src/models/users.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Enum `app_role` do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "app_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    Manager,
    Sales,
    Viewer,
}

impl AppRole {
    /// Só o cargo de vendas é vinculado a um almacén.
    pub fn is_store_scoped(self) -> bool {
        matches!(self, AppRole::Sales)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppRole::Admin => "admin",
            AppRole::Manager => "manager",
            AppRole::Sales => "sales",
            AppRole::Viewer => "viewer",
        }
    }
}

// Tabela `profiles` (id = id do usuário no Auth)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    #[schema(example = "caja1@tienda.com")]
    pub email: String,
    #[schema(example = "María López")]
    pub full_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

// Tabela `user_roles`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: AppRole,
    pub almacen_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

// Linha a ser inserida em `user_roles`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRole {
    pub user_id: Uuid,
    pub role: AppRole,
    pub almacen_id: Option<Uuid>,
}

// Cargo já com o nome do almacén anexado
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub id: Uuid,
    pub role: AppRole,
    pub almacen_id: Option<Uuid>,
    #[schema(example = "Sucursal Centro")]
    pub almacen_nombre: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRoles {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub roles: Vec<RoleView>,
}

// Resultado do reparo de perfil/cargo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub profile_created: bool,
    pub role_created: bool,
}

// POST /api/users/{id}/roles
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolePayload {
    #[schema(example = "sales")]
    pub role: AppRole,
    pub almacen_id: Option<Uuid>,
}

// PUT /api/users/{id}/roles
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRolesPayload {
    #[schema(example = "sales")]
    pub role: AppRole,
    #[serde(default)]
    #[schema(example = json!(["550e8400-e29b-41d4-a716-446655440000"]))]
    pub almacen_ids: Vec<Uuid>,
}
