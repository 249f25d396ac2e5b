use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use reelview::api::HttpAccountApi;
use reelview::embedded::EmbeddedData;
use reelview::pages::{Page, PageKind};
use reelview::toggle::{ToggleButton, ToggleKind};
use reelview::widgets::{RatingWidget, SubmitOutcome};
use std::env;
use std::fs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:
  reelview render <list|movie|person> <page.html> [pathname]
  reelview rate <movie_id> <stars 1-5>
  reelview watchlist <movie_id> <on|off>
  reelview favorite <movie_id> <on|off>
  reelview delete-rating <movie_id>";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn arg<'a>(args: &'a [String], idx: usize, what: &str) -> Result<&'a str> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing {}\n{}", what, USAGE))
}

fn movie_id(args: &[String]) -> Result<i64> {
    arg(args, 2, "movie_id")?
        .parse()
        .context("movie_id must be an integer")
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "add" => Ok(true),
        "off" | "false" | "remove" => Ok(false),
        _ => Err(anyhow!("expected 'on' or 'off', got '{}'", value)),
    }
}

fn report(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Confirmed => Ok(()),
        SubmitOutcome::Rejected(reason) => Err(anyhow!(
            "server rejected the request: {}",
            reason.unwrap_or_else(|| "no reason given".to_string())
        )),
        SubmitOutcome::Failed => Err(anyhow!("request failed, see log")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let command = arg(&args, 1, "command")?;
    let api = HttpAccountApi::from_env()?;
    info!("Using host {}", api.config().host);

    match command {
        "render" => {
            let kind: PageKind = arg(&args, 2, "page kind")?.parse()?;
            let path = arg(&args, 3, "page file")?;
            let pathname = args.get(4).map(String::as_str).unwrap_or("/");
            let html = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            let data = EmbeddedData::from_html(&html);
            let page = Page::load(kind, &data, &api, pathname).await?;
            if let Page::MovieDetails(details) = &page {
                if let Some(style) = details.backdrop_style() {
                    println!("<!-- #banner-div style=\"{}\" -->", style);
                }
            }
            for fragment in page.fragments() {
                println!("<!-- #{} -->", fragment.target);
                println!("{}", fragment.to_html());
            }
            Ok(())
        }
        "rate" => {
            let id = movie_id(&args)?;
            let stars: usize = arg(&args, 3, "stars")?
                .parse()
                .context("stars must be an integer")?;
            if !(1..=5).contains(&stars) {
                return Err(anyhow!("stars must be between 1 and 5"));
            }
            let mut widget = RatingWidget::new(id, None);
            report(widget.rate(stars - 1, &api).await?)
        }
        "watchlist" | "favorite" => {
            let id = movie_id(&args)?;
            let wanted = parse_switch(arg(&args, 3, "on|off")?)?;
            let kind = if command == "watchlist" {
                ToggleKind::Watchlist
            } else {
                ToggleKind::Favorite
            };
            let mut button = ToggleButton::new(id, kind, !wanted);
            report(button.toggle(&api).await)
        }
        "delete-rating" => {
            let id = movie_id(&args)?;
            let mut widget = RatingWidget::new(id, None);
            report(widget.delete_rating(&api).await)
        }
        other => Err(anyhow!("unknown command '{}'\n{}", other, USAGE)),
    }
}
