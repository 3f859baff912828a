//! services/api/src/bin/openapi.rs
//!
//! Prints the OpenAPI document of the mood journal REST API.
//!
//! Usage: `openapi [PATH]`. The document goes to `openapi.json` by default,
//! or to stdout when `PATH` is `-`.

use api_lib::web::rest::ApiDoc;
use std::io::Write;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let doc = ApiDoc::openapi();
    let routes = doc.paths.paths.len();
    let json = doc.to_pretty_json()?;

    if target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(&target, json)?;
        eprintln!("Wrote {} routes of the mood journal API to {}", routes, target);
    }
    Ok(())
}
