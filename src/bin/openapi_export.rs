//! Print the OpenAPI document as pretty JSON.
//!
//! cargo run --bin openapi_export > openapi.json

use anyhow::{Context, Result};
use utoipa::OpenApi;

use jsonapi_errors::api::openapi::ApiDoc;

fn main() -> Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI document")?;
    println!("{}", json);
    Ok(())
}
