pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use handlers::{AppState, AppStateInner};
pub use routes::{create_router, with_error_layers};
