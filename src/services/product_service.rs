// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::{Connection, PgConnection};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, StoreRepository},
    models::{
        products::{InventoryRow, ProductFilter, ProductPayload, ProductWithStock, Producto, StoreStock},
        stores::Almacen,
    },
    utils::{
        format::{format_currency, format_quantity, StockStatus},
        stock::{aggregate_stock, StockSummary, StoreVisibility},
    },
};

// Quantidade negativa não deveria existir no banco; se existir, mostra o número cru.
fn display_quantity(cantidad: Decimal, unidad: &str) -> String {
    format_quantity(cantidad, unidad).unwrap_or_else(|_| format!("{} {}", cantidad, unidad))
}

pub fn to_view(producto: Producto, summary: &StockSummary, store_names: &HashMap<Uuid, String>) -> ProductWithStock {
    let estado = StockStatus::of(summary.total, producto.stock_minimo, producto.stock_maximo);

    let mut stock_por_almacen: Vec<StoreStock> = summary
        .por_almacen
        .iter()
        .map(|(almacen_id, cantidad)| StoreStock {
            almacen_id: *almacen_id,
            almacen_nombre: store_names.get(almacen_id).cloned(),
            cantidad: *cantidad,
            cantidad_formateada: display_quantity(*cantidad, &producto.unidad),
        })
        .collect();
    stock_por_almacen.sort_by(|a, b| a.almacen_nombre.cmp(&b.almacen_nombre));

    ProductWithStock {
        stock_total: summary.total,
        stock_total_formateado: display_quantity(summary.total, &producto.unidad),
        precio_venta_formateado: format_currency(producto.precio_venta),
        estado_stock: estado,
        color_estado: estado.color().to_string(),
        stock_por_almacen,
        producto,
    }
}

/// Agrega o inventário, aplica a visibilidade do usuário e os filtros da listagem.
pub fn build_product_views(
    products: Vec<Producto>,
    inventory: &[InventoryRow],
    stores: &[Almacen],
    visibility: &StoreVisibility,
    filter: &ProductFilter,
) -> Vec<ProductWithStock> {
    let aggregated = aggregate_stock(inventory);
    let store_names: HashMap<Uuid, String> = stores.iter().map(|s| (s.id, s.nombre.clone())).collect();

    let search = filter.search.as_deref().map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    let categoria = filter.categoria.as_deref().map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty());

    // Filtro por almacén: só se o usuário enxerga esse almacén
    let scope = match filter.almacen_id {
        Some(id) if visibility.allows(id) => StoreVisibility::Only(HashSet::from([id])),
        Some(_) => return Vec::new(),
        None => visibility.clone(),
    };

    products
        .into_iter()
        .filter(|p| match &search {
            Some(term) => p.nombre.to_lowercase().contains(term),
            None => true,
        })
        .filter(|p| match &categoria {
            Some(cat) => p.categoria.as_deref().map(|c| c.to_lowercase()) == Some(cat.clone()),
            None => true,
        })
        .filter_map(|p| {
            let summary = aggregated
                .get(&p.id)
                .map(|s| s.restricted_to(&scope))
                .unwrap_or_default();

            if let Some(almacen_id) = filter.almacen_id {
                if !summary.por_almacen.contains_key(&almacen_id) {
                    return None;
                }
            }

            let view = to_view(p, &summary, &store_names);
            if filter.solo_stock_bajo && !view.estado_stock.is_low() {
                return None;
            }
            Some(view)
        })
        .collect()
}

pub fn count_low_stock(products: &[Producto], inventory: &[InventoryRow]) -> i64 {
    let aggregated = aggregate_stock(inventory);
    products
        .iter()
        .filter(|p| {
            let total = aggregated.get(&p.id).map(|s| s.total).unwrap_or(Decimal::ZERO);
            StockStatus::of(total, p.stock_minimo, p.stock_maximo).is_low()
        })
        .count() as i64
}

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    store_repo: StoreRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository, store_repo: StoreRepository) -> Self {
        Self { repo, store_repo }
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        visibility: &StoreVisibility,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithStock>, AppError> {

        let products = self.repo.list(&mut *conn).await?;
        let inventory = self.repo.list_inventory(&mut *conn).await?;
        let stores = self.store_repo.list(&mut *conn).await?;

        Ok(build_product_views(products, &inventory, &stores, visibility, filter))
    }

    pub async fn get(&self, conn: &mut PgConnection, id: Uuid, visibility: &StoreVisibility) -> Result<ProductWithStock, AppError> {

        let producto = self
            .repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::NotFound("Produto".into()))?;
        let inventory = self.repo.inventory_for_product(&mut *conn, id).await?;
        let stores = self.store_repo.list(&mut *conn).await?;

        let summary = aggregate_stock(&inventory)
            .remove(&id)
            .unwrap_or_default()
            .restricted_to(visibility);
        let store_names: HashMap<Uuid, String> = stores.into_iter().map(|s| (s.id, s.nombre)).collect();

        Ok(to_view(producto, &summary, &store_names))
    }

    // --- CREATE (com estoque inicial opcional por almacén) ---
    pub async fn create(&self, conn: &mut PgConnection, payload: &ProductPayload) -> Result<Producto, AppError> {
        let mut tx = conn.begin().await?;

        let producto = self.repo.create(&mut *tx, payload).await?;

        for inicial in &payload.stock_inicial {
            self.repo
                .set_stock(&mut *tx, producto.id, inicial.almacen_id, inicial.cantidad)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(producto_id = %producto.id, "📦 Produto criado: {}", producto.nombre);
        Ok(producto)
    }

    pub async fn update(&self, conn: &mut PgConnection, id: Uuid, payload: &ProductPayload) -> Result<Producto, AppError> {
        self.repo
            .update(&mut *conn, id, payload)
            .await?
            .ok_or(AppError::NotFound("Produto".into()))
    }

    pub async fn delete(&self, conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        if self.repo.delete(&mut *conn, id).await? == 0 {
            return Err(AppError::NotFound("Produto".into()));
        }
        tracing::info!(producto_id = %id, "Produto removido");
        Ok(())
    }

    // Ajuste manual do saldo de um produto em um almacén
    pub async fn set_stock(
        &self,
        conn: &mut PgConnection,
        producto_id: Uuid,
        almacen_id: Uuid,
        cantidad: Decimal,
    ) -> Result<InventoryRow, AppError> {
        let mut tx = conn.begin().await?;

        self.repo
            .find_by_id(&mut *tx, producto_id)
            .await?
            .ok_or(AppError::NotFound("Produto".into()))?;
        self.store_repo
            .find_by_id(&mut *tx, almacen_id)
            .await?
            .ok_or(AppError::NotFound("Almacén".into()))?;

        let row = self.repo.set_stock(&mut *tx, producto_id, almacen_id, cantidad).await?;

        tx.commit().await?;
        tracing::info!(%producto_id, %almacen_id, %cantidad, "Saldo ajustado");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producto(nombre: &str, categoria: &str, minimo: i64) -> Producto {
        Producto {
            id: Uuid::new_v4(),
            nombre: nombre.into(),
            categoria: Some(categoria.into()),
            unidad: "g".into(),
            precio_venta: Decimal::from(2),
            precio_compra: Decimal::ONE,
            stock_minimo: Decimal::from(minimo),
            stock_maximo: Decimal::ZERO,
            created_at: None,
        }
    }

    fn almacen(nombre: &str) -> Almacen {
        Almacen { id: Uuid::new_v4(), nombre: nombre.into(), direccion: None, created_at: None }
    }

    fn row(p: &Producto, a: &Almacen, cantidad: i64) -> InventoryRow {
        InventoryRow { producto_id: p.id, almacen_id: a.id, cantidad: Decimal::from(cantidad) }
    }

    #[test]
    fn test_views_aggregate_and_format() {
        let arroz = producto("Arroz", "Abarrotes", 100);
        let (centro, norte) = (almacen("Centro"), almacen("Norte"));
        let inventory = vec![row(&arroz, &norte, 600), row(&arroz, &centro, 900)];

        let views = build_product_views(
            vec![arroz.clone()],
            &inventory,
            &[centro.clone(), norte.clone()],
            &StoreVisibility::All,
            &ProductFilter::default(),
        );

        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.stock_total, Decimal::from(1500));
        assert_eq!(view.stock_total_formateado, "1.5kg");
        assert_eq!(view.precio_venta_formateado, "$2.00");
        assert_eq!(view.estado_stock, StockStatus::Normal);
        assert_eq!(view.stock_por_almacen[0].almacen_nombre.as_deref(), Some("Centro"));
        assert_eq!(view.stock_por_almacen[0].cantidad_formateada, "900g");
    }

    #[test]
    fn test_sales_user_sees_only_own_store() {
        let arroz = producto("Arroz", "Abarrotes", 0);
        let (centro, norte) = (almacen("Centro"), almacen("Norte"));
        let inventory = vec![row(&arroz, &centro, 10), row(&arroz, &norte, 5)];
        let visibility = StoreVisibility::Only(HashSet::from([norte.id]));

        let views = build_product_views(
            vec![arroz],
            &inventory,
            &[centro.clone(), norte.clone()],
            &visibility,
            &ProductFilter::default(),
        );
        assert_eq!(views[0].stock_total, Decimal::from(5));
        assert_eq!(views[0].stock_por_almacen.len(), 1);

        // Pedir um almacén que o usuário não enxerga devolve lista vazia
        let filter = ProductFilter { almacen_id: Some(centro.id), ..Default::default() };
        let hidden = build_product_views(vec![producto("X", "Y", 0)], &inventory, &[], &visibility, &filter);
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_filters() {
        let arroz = producto("Arroz Extra", "Abarrotes", 50);
        let leche = producto("Leche", "Lacteos", 5);
        let centro = almacen("Centro");
        let inventory = vec![row(&arroz, &centro, 10), row(&leche, &centro, 40)];
        let products = vec![arroz.clone(), leche.clone()];

        let by_search = ProductFilter { search: Some("arroz".into()), ..Default::default() };
        let views = build_product_views(products.clone(), &inventory, &[], &StoreVisibility::All, &by_search);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].producto.id, arroz.id);

        let by_category = ProductFilter { categoria: Some("LACTEOS".into()), ..Default::default() };
        let views = build_product_views(products.clone(), &inventory, &[], &StoreVisibility::All, &by_category);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].producto.id, leche.id);

        let low = ProductFilter { solo_stock_bajo: true, ..Default::default() };
        let views = build_product_views(products.clone(), &inventory, &[], &StoreVisibility::All, &low);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].estado_stock, StockStatus::Bajo);

        assert_eq!(count_low_stock(&products, &inventory), 1);
    }

    #[test]
    fn test_product_without_inventory_is_out_of_stock() {
        let sal = producto("Sal", "Abarrotes", 1);
        assert_eq!(count_low_stock(std::slice::from_ref(&sal), &[]), 1);

        let views = build_product_views(vec![sal], &[], &[], &StoreVisibility::All, &ProductFilter::default());
        assert_eq!(views[0].stock_total, Decimal::ZERO);
        assert_eq!(views[0].estado_stock, StockStatus::SinStock);
        assert_eq!(views[0].color_estado, "red");
    }
}
