// src/services/auth_admin.rs

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::common::error::AppError;

/// Operações administrativas no serviço de Auth do BaaS.
#[async_trait]
pub trait AuthAdmin: Send + Sync {
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError>;
}

// Cliente da API admin do GoTrue (`/auth/v1/admin/users`), autenticado com a service role key.
pub struct GoTrueAdmin {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl GoTrueAdmin {
    pub fn new(base_url: &str, service_role_key: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        })
    }
}

#[async_trait]
impl AuthAdmin for GoTrueAdmin {
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        let url = format!("{}/auth/v1/admin/users/{}", self.base_url, user_id);

        let response = self
            .client
            .delete(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("🗑️ Usuário {} removido do Auth", user_id);
            return Ok(());
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::UserNotFound);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::AuthAdminError(format!("{}: {}", status, body)))
    }
}
