// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::utils;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Users ---
        handlers::users::sync_me,
        handlers::users::repair_me,
        handlers::users::get_me,
        handlers::users::list_users,
        handlers::users::assign_role,
        handlers::users::replace_roles,
        handlers::users::remove_role,

        // --- Stores ---
        handlers::stores::list_stores,
        handlers::stores::create_store,
        handlers::stores::update_store,
        handlers::stores::delete_store,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::set_stock,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::create_sale,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_sales_chart,
        handlers::dashboard::get_top_products,

        // --- Functions ---
        handlers::functions::delete_user,
        handlers::functions::get_user_id_by_email,
    ),
    components(
        schemas(
            // --- Users ---
            models::users::AppRole,
            models::users::Profile,
            models::users::UserRole,
            models::users::RoleView,
            models::users::UserWithRoles,
            models::users::SyncReport,
            models::users::AssignRolePayload,
            models::users::ReplaceRolesPayload,

            // --- Stores ---
            models::stores::Almacen,
            models::stores::StorePayload,

            // --- Products ---
            models::products::Producto,
            models::products::StoreStock,
            models::products::ProductWithStock,
            models::products::InitialStock,
            models::products::ProductPayload,
            models::products::SetStockPayload,
            utils::format::StockStatus,

            // --- Sales ---
            models::sales::Venta,
            models::sales::DetalleVentaView,
            models::sales::VentaDetail,
            models::sales::SaleLinePayload,
            models::sales::CreateSalePayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::SalesChartEntry,
            models::dashboard::TopProductEntry,

            // --- Functions ---
            models::functions::DeleteUserPayload,
            models::functions::DeleteUserResponse,
            models::functions::UserIdByEmailPayload,
        )
    ),
    tags(
        (name = "Users", description = "Perfis, cargos e sincronização após login"),
        (name = "Stores", description = "Almacenes"),
        (name = "Products", description = "Produtos e saldos por almacén"),
        (name = "Sales", description = "Vendas e baixa de estoque"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais"),
        (name = "Functions", description = "Operações privilegiadas (service role)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/users/me/sync",
            "/api/users/{id}/roles/{roleId}",
            "/api/products/{id}/stock/{storeId}",
            "/api/sales",
            "/api/dashboard/summary",
            "/api/functions/delete-user",
            "/api/functions/get_user_id_by_email",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "faltando {}", expected);
        }
    }
}
