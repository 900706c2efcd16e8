pub mod auth_admin;
pub mod dashboard_service;
pub mod product_service;
pub mod role_service;
pub mod sales_service;
pub mod store_service;
pub mod user_service;

pub use dashboard_service::DashboardService;
pub use product_service::ProductService;
pub use role_service::RoleService;
pub use sales_service::SalesService;
pub use store_service::StoreService;
pub use user_service::UserService;
