use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação que age como o usuário do token: as policies de RLS
/// do banco leem `request.jwt.claims` (via `auth.uid()`) e o papel `authenticated`.
/// As variáveis são locais, então só valem até o commit/rollback.
pub(crate) async fn begin_rls_tx(
    app_state: &AppState,
    user: &AuthenticatedUser,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let claims = serde_json::to_string(&user.0)
        .map_err(|e| anyhow::anyhow!("Falha ao serializar claims: {}", e))?;

    let mut tx = app_state.db_pool.begin().await?;

    sqlx::query("SELECT set_config('request.jwt.claims', $1, true)")
        .bind(claims)
        .execute(&mut *tx)
        .await?;

    sqlx::query("SET LOCAL ROLE authenticated")
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
