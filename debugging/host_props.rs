//! Query the host server's auth endpoints and print what a page would see.
//! Usage:
//!   cargo run --bin host_props
//!   cargo run --bin host_props -- <page.html>
//! Reads REELVIEW_HOST / TMDB_API_BASE from the environment (.env supported).
//! With a page file, also lists the embedded JSON blob ids.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reelview::api::{fetch_credentials, AccountApi, HttpAccountApi};
use reelview::embedded::EmbeddedData;
use serde_json::json;
use std::env;
use std::fs;

fn mask(value: &str) -> String {
    let shown: String = value.chars().take(4).collect();
    format!("{shown}… ({} chars)", value.chars().count())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    let api = HttpAccountApi::from_env()?;

    let logged_in = api.logged_in().await.context("GET /api/logged_in")?;
    let credentials = match fetch_credentials(&api).await {
        Ok(c) => json!({
            "session_id": mask(&c.session_id),
            "access_token": mask(&c.access_token),
        }),
        Err(e) => json!({ "error": format!("{:#}", e) }),
    };

    let blobs = match args.get(1) {
        Some(path) => {
            let html = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            let data = EmbeddedData::from_html(&html);
            json!(data.ids())
        }
        None => json!(null),
    };

    let out = json!({
        "host": api.config().host,
        "tmdb_base": api.config().tmdb_base,
        "logged_in": logged_in,
        "credentials": credentials,
        "embedded": blobs,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
