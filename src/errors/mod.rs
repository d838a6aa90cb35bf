//! JSON API error handling

pub mod app_error;
pub mod kind;
pub mod overrides;
pub mod response;
pub mod translator;

pub use app_error::{AppError, JsonFault};
pub use kind::{ErrorDefault, ErrorKind};
pub use overrides::{ErrorOverride, ErrorOverrides};
pub use response::{ErrorDocument, ErrorObject, ErrorResponse};
pub use translator::{render, translate};
