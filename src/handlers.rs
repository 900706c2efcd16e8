pub mod dashboard;
pub mod functions;
pub mod products;
pub mod sales;
pub mod stores;
pub mod users;
