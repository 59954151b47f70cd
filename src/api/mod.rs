pub mod handlers;
pub mod handlers_admin;
pub mod routes;
pub mod session;
pub mod views;
