// src/utils/stock.rs

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{
    products::InventoryRow,
    users::{AppRole, UserRole},
};

// Estoque de um produto: total + quebra por almacén
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSummary {
    pub total: Decimal,
    pub por_almacen: HashMap<Uuid, Decimal>,
}

impl StockSummary {
    pub fn add(&mut self, almacen_id: Uuid, cantidad: Decimal) {
        *self.por_almacen.entry(almacen_id).or_insert(Decimal::ZERO) += cantidad;
        self.total += cantidad;
    }

    /// Mantém só os almacenes visíveis e recalcula o total.
    pub fn restricted_to(&self, visibility: &StoreVisibility) -> StockSummary {
        let mut restricted = StockSummary::default();
        for (almacen_id, cantidad) in &self.por_almacen {
            if visibility.allows(*almacen_id) {
                restricted.add(*almacen_id, *cantidad);
            }
        }
        restricted
    }
}

/// Soma as linhas de `inventario` por produto.
pub fn aggregate_stock(rows: &[InventoryRow]) -> HashMap<Uuid, StockSummary> {
    let mut by_product: HashMap<Uuid, StockSummary> = HashMap::new();
    for row in rows {
        by_product
            .entry(row.producto_id)
            .or_default()
            .add(row.almacen_id, row.cantidad);
    }
    by_product
}

// Quais almacenes um usuário enxerga
#[derive(Debug, Clone, PartialEq)]
pub enum StoreVisibility {
    All,
    Only(HashSet<Uuid>),
}

impl StoreVisibility {
    /// Admin e manager enxergam tudo. Quem tem cargo de vendas fica restrito
    /// aos almacenes desses cargos, mesmo que também seja viewer.
    pub fn from_roles(roles: &[UserRole]) -> Self {
        let has_sales = roles.iter().any(|r| r.role == AppRole::Sales);
        if has_global_role(roles) || !has_sales {
            return StoreVisibility::All;
        }
        StoreVisibility::Only(sales_stores(roles))
    }

    /// Almacenes onde o usuário pode registrar vendas.
    pub fn sell_scope(roles: &[UserRole]) -> Self {
        if has_global_role(roles) {
            return StoreVisibility::All;
        }
        StoreVisibility::Only(sales_stores(roles))
    }

    pub fn allows(&self, almacen_id: Uuid) -> bool {
        match self {
            StoreVisibility::All => true,
            StoreVisibility::Only(stores) => stores.contains(&almacen_id),
        }
    }
}

fn has_global_role(roles: &[UserRole]) -> bool {
    roles
        .iter()
        .any(|r| matches!(r.role, AppRole::Admin | AppRole::Manager))
}

fn sales_stores(roles: &[UserRole]) -> HashSet<Uuid> {
    roles
        .iter()
        .filter(|r| r.role == AppRole::Sales)
        .filter_map(|r| r.almacen_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(producto_id: Uuid, almacen_id: Uuid, cantidad: i64) -> InventoryRow {
        InventoryRow { producto_id, almacen_id, cantidad: Decimal::from(cantidad) }
    }

    fn role(role: AppRole, almacen_id: Option<Uuid>) -> UserRole {
        UserRole { id: Uuid::new_v4(), user_id: Uuid::nil(), role, almacen_id, created_at: None }
    }

    #[test]
    fn test_empty_input() {
        let aggregated = aggregate_stock(&[]);
        assert!(aggregated.is_empty());

        let missing = aggregated.get(&Uuid::new_v4()).cloned().unwrap_or_default();
        assert_eq!(missing.total, Decimal::ZERO);
        assert!(missing.por_almacen.is_empty());
    }

    #[test]
    fn test_total_matches_sum_of_stores() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let (a1, a2) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![row(p1, a1, 10), row(p1, a2, 5), row(p2, a1, 7), row(p1, a1, 3)];

        let aggregated = aggregate_stock(&rows);
        assert_eq!(aggregated.len(), 2);

        for summary in aggregated.values() {
            let sum: Decimal = summary.por_almacen.values().sum();
            assert_eq!(sum, summary.total);
        }

        let p1_stock = &aggregated[&p1];
        assert_eq!(p1_stock.total, Decimal::from(18));
        assert_eq!(p1_stock.por_almacen[&a1], Decimal::from(13));
        assert_eq!(p1_stock.por_almacen[&a2], Decimal::from(5));
    }

    #[test]
    fn test_restriction_recomputes_total() {
        let p = Uuid::new_v4();
        let (a1, a2) = (Uuid::new_v4(), Uuid::new_v4());
        let aggregated = aggregate_stock(&[row(p, a1, 4), row(p, a2, 6)]);

        let visibility = StoreVisibility::Only(HashSet::from([a2]));
        let restricted = aggregated[&p].restricted_to(&visibility);
        assert_eq!(restricted.total, Decimal::from(6));
        assert_eq!(restricted.por_almacen.len(), 1);
        assert!(!restricted.por_almacen.contains_key(&a1));
    }

    #[test]
    fn test_visibility_from_roles() {
        let store = Uuid::new_v4();
        let sales_only = vec![role(AppRole::Sales, Some(store))];
        assert_eq!(
            StoreVisibility::from_roles(&sales_only),
            StoreVisibility::Only(HashSet::from([store]))
        );

        let mixed = vec![role(AppRole::Sales, Some(store)), role(AppRole::Manager, None)];
        assert_eq!(StoreVisibility::from_roles(&mixed), StoreVisibility::All);
        assert_eq!(StoreVisibility::from_roles(&[]), StoreVisibility::All);
    }

    #[test]
    fn test_viewer_does_not_widen_sales_scope() {
        let (own, other) = (Uuid::new_v4(), Uuid::new_v4());
        let roles = vec![role(AppRole::Viewer, None), role(AppRole::Sales, Some(own))];

        let visibility = StoreVisibility::from_roles(&roles);
        assert!(visibility.allows(own));
        assert!(!visibility.allows(other));

        let sell = StoreVisibility::sell_scope(&roles);
        assert!(sell.allows(own));
        assert!(!sell.allows(other));
    }

    #[test]
    fn test_viewer_only_sees_everything_but_sells_nowhere() {
        let roles = vec![role(AppRole::Viewer, None)];
        assert_eq!(StoreVisibility::from_roles(&roles), StoreVisibility::All);
        assert!(!StoreVisibility::sell_scope(&roles).allows(Uuid::new_v4()));
    }

    #[test]
    fn test_manager_sells_in_any_store() {
        let roles = vec![role(AppRole::Manager, None)];
        assert_eq!(StoreVisibility::sell_scope(&roles), StoreVisibility::All);
    }
}
