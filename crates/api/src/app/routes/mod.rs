use axum::Router;

pub mod inventory;
pub mod operations;
pub mod orders;
pub mod system;
pub mod webhook;

pub fn router() -> Router {
    Router::new()
        .merge(orders::router())
        .merge(inventory::router())
        .merge(webhook::router())
        .merge(operations::router())
}
