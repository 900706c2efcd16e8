// src/models/functions.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Corpo do `delete-user`. O campo é opcional para devolvermos 400 com `{error}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserPayload {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteUserResponse {
    pub success: bool,
}

// Corpo do `get_user_id_by_email`
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserIdByEmailPayload {
    #[schema(example = "caja1@tienda.com")]
    pub email: Option<String>,
}
