pub mod logging;
pub mod maintenance;
pub mod render;
pub mod session_token;

pub use logging::logging_middleware;
pub use maintenance::maintenance_guard;
pub use render::{handle_panic, render_errors};
pub use session_token::verify_session_token;
