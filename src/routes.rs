// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users))
        .route("/me", get(handlers::users::get_me))
        .route("/me/sync", post(handlers::users::sync_me))
        .route("/me/repair", post(handlers::users::repair_me))
        .route(
            "/{id}/roles",
            post(handlers::users::assign_role).put(handlers::users::replace_roles),
        )
        .route("/{id}/roles/{role_id}", delete(handlers::users::remove_role));

    let store_routes = Router::new()
        .route(
            "/",
            get(handlers::stores::list_stores).post(handlers::stores::create_store),
        )
        .route(
            "/{id}",
            put(handlers::stores::update_store).delete(handlers::stores::delete_store),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/stock/{store_id}", put(handlers::products::set_stock));

    let sales_routes = Router::new()
        .route(
            "/",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route("/{id}", get(handlers::sales::get_sale));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/sales-chart", get(handlers::dashboard::get_sales_chart))
        .route("/top-products", get(handlers::dashboard::get_top_products));

    let function_routes = Router::new()
        .route("/delete-user", post(handlers::functions::delete_user))
        .route("/get_user_id_by_email", post(handlers::functions::get_user_id_by_email));

    // Tudo abaixo exige Bearer válido
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/stores", store_routes)
        .nest("/api/products", product_routes)
        .nest("/api/sales", sales_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/functions", function_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
