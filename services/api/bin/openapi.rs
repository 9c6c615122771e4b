//! Writes the Herald OpenAPI document to disk.
//!
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use herald_api::router::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));
    std::fs::write(&output, ApiDoc::openapi().to_pretty_json()?)?;
    println!("Wrote {}", output.display());
    Ok(())
}
