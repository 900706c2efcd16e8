// src/services/role_service.rs

use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RoleRepository,
    models::users::{AppRole, NewUserRole, UserRole},
};

/// `sales` exige almacén; os demais cargos nunca levam almacén.
pub fn normalize_assignment(role: AppRole, almacen_id: Option<Uuid>) -> Result<Option<Uuid>, AppError> {
    match (role.is_store_scoped(), almacen_id) {
        (true, Some(id)) => Ok(Some(id)),
        (true, None) => Err(AppError::BadRequest(
            "O cargo 'sales' precisa de um almacén.".into(),
        )),
        (false, _) => Ok(None),
    }
}

/// Linhas de `user_roles` para a substituição completa dos cargos.
/// `sales` vira uma linha por almacén (sem repetidos, na ordem recebida).
pub fn plan_role_rows(
    user_id: Uuid,
    role: AppRole,
    almacen_ids: &[Uuid],
) -> Result<Vec<NewUserRole>, AppError> {
    if !role.is_store_scoped() {
        return Ok(vec![NewUserRole { user_id, role, almacen_id: None }]);
    }

    let mut unique: Vec<Uuid> = Vec::with_capacity(almacen_ids.len());
    for id in almacen_ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }

    if unique.is_empty() {
        return Err(AppError::BadRequest(
            "Selecione ao menos um almacén para o cargo 'sales'.".into(),
        ));
    }

    Ok(unique
        .into_iter()
        .map(|almacen_id| NewUserRole { user_id, role, almacen_id: Some(almacen_id) })
        .collect())
}

#[derive(Clone)]
pub struct RoleService {
    repo: RoleRepository,
}

impl RoleService {
    pub fn new(repo: RoleRepository) -> Self {
        Self { repo }
    }

    // Atribuição com checagem de duplicidade (usuário, cargo, almacén)
    pub async fn assign_role(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        role: AppRole,
        almacen_id: Option<Uuid>,
    ) -> Result<UserRole, AppError> {
        let almacen_id = normalize_assignment(role, almacen_id)?;
        let mut tx = conn.begin().await?;

        if self.repo.exists(&mut *tx, user_id, role, almacen_id).await? {
            return Err(AppError::RoleAlreadyAssigned);
        }

        let new_role = NewUserRole { user_id, role, almacen_id };
        let created = self.repo.insert(&mut *tx, &new_role).await?;

        tx.commit().await?;
        tracing::info!(%user_id, role = role.as_str(), ?almacen_id, "Cargo atribuído");
        Ok(created)
    }

    // Apaga todos os cargos do usuário e insere os novos
    pub async fn replace_roles(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        role: AppRole,
        almacen_ids: &[Uuid],
    ) -> Result<Vec<UserRole>, AppError> {
        let rows = plan_role_rows(user_id, role, almacen_ids)?;
        let mut tx = conn.begin().await?;

        let removed = self.repo.delete_all_for_user(&mut *tx, user_id).await?;

        let created = if role.is_store_scoped() {
            let stores: Vec<Uuid> = rows.iter().filter_map(|r| r.almacen_id).collect();
            self.repo.insert_for_stores(&mut *tx, user_id, role, &stores).await?
        } else {
            let mut created = Vec::with_capacity(rows.len());
            for row in &rows {
                created.push(self.repo.insert(&mut *tx, row).await?);
            }
            created
        };

        tx.commit().await?;
        tracing::info!(%user_id, role = role.as_str(), removed, created = created.len(), "Cargos substituídos");
        Ok(created)
    }

    pub async fn remove_role(&self, conn: &mut PgConnection, user_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete_by_id(&mut *conn, user_id, role_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Cargo".into()));
        }
        Ok(())
    }

    pub async fn user_has_any_role(&self, user_id: Uuid, roles: &[AppRole]) -> Result<bool, AppError> {
        self.repo.user_has_any_role(user_id, roles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_requires_store() {
        let store = Uuid::new_v4();
        assert_eq!(normalize_assignment(AppRole::Sales, Some(store)).unwrap(), Some(store));
        assert!(matches!(
            normalize_assignment(AppRole::Sales, None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_non_sales_roles_drop_store() {
        let store = Uuid::new_v4();
        assert_eq!(normalize_assignment(AppRole::Manager, Some(store)).unwrap(), None);
        assert_eq!(normalize_assignment(AppRole::Viewer, None).unwrap(), None);
    }

    #[test]
    fn test_plan_sales_multi_store() {
        let user = Uuid::new_v4();
        let (a1, a2) = (Uuid::new_v4(), Uuid::new_v4());

        let rows = plan_role_rows(user, AppRole::Sales, &[a1, a2, a1]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].almacen_id, Some(a1));
        assert_eq!(rows[1].almacen_id, Some(a2));
        assert!(rows.iter().all(|r| r.user_id == user && r.role == AppRole::Sales));
    }

    #[test]
    fn test_plan_sales_without_stores_fails() {
        assert!(plan_role_rows(Uuid::new_v4(), AppRole::Sales, &[]).is_err());
    }

    #[test]
    fn test_plan_admin_is_single_row() {
        let user = Uuid::new_v4();
        let rows = plan_role_rows(user, AppRole::Admin, &[Uuid::new_v4()]).unwrap();
        assert_eq!(rows, vec![NewUserRole { user_id: user, role: AppRole::Admin, almacen_id: None }]);
    }
}
