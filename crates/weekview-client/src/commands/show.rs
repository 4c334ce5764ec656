//! The `show` command: fetch the week and print it.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::debug;
use weekview_core::{TimeFormat, UserClaims, resolve_timezone};
use weekview_providers::{EventSource, MemorySource, RawEvent, build_week_view};

use crate::cli::ShowArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::render::WeekRenderer;

/// Prints the week to stdout.
pub async fn run(args: ShowArgs, config: &ClientConfig) -> ClientResult<()> {
    let output = render(&args, config).await?;
    print!("{}", output);
    Ok(())
}

/// Builds the week and renders it as text or JSON.
pub async fn render(args: &ShowArgs, config: &ClientConfig) -> ClientResult<String> {
    let claims = config.claims();
    let timezone = args
        .timezone
        .as_deref()
        .or_else(|| claims.timezone())
        .map(str::to_string);
    let today = args
        .date
        .unwrap_or_else(|| local_today(timezone.as_deref()));

    let source = open_source(args, config)?;
    debug!(source = source.name(), %today, timezone = ?timezone, "building week view");
    let page = build_week_view(source.as_ref(), today, timezone.as_deref()).await?;

    let pattern = args.time_format.as_deref().or_else(|| claims.time_format());
    let mut renderer = WeekRenderer::new(pattern.map(TimeFormat::from_pattern).unwrap_or_default());
    if let Some(name) = claims.display_name() {
        renderer = renderer.with_heading(name);
    }

    if args.json {
        Ok(renderer.render_json(&page)? + "\n")
    } else {
        Ok(renderer.render_text(&page))
    }
}

/// Today's date in the viewer's zone.
fn local_today(timezone: Option<&str>) -> NaiveDate {
    Utc::now()
        .with_timezone(&resolve_timezone(timezone))
        .date_naive()
}

fn open_source(args: &ShowArgs, config: &ClientConfig) -> ClientResult<Box<dyn EventSource>> {
    if let Some(ref path) = args.events_file {
        let events = load_events_file(path)?;
        return Ok(Box::new(MemorySource::new(events).with_name("file")));
    }
    graph_source(config)
}

/// Reads a JSON array of raw events.
pub fn load_events_file(path: &Path) -> ClientResult<Vec<RawEvent>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        ClientError::Source(format!("invalid events file {}: {}", path.display(), e))
    })
}

#[cfg(feature = "graph")]
fn graph_source(config: &ClientConfig) -> ClientResult<Box<dyn EventSource>> {
    use std::sync::Arc;
    use weekview_providers::graph::GraphEventSource;
    use weekview_providers::{Authenticator, StaticToken};

    let source_config = config
        .graph
        .to_source_config()
        .map_err(ClientError::Config)?;
    let token = config
        .graph
        .resolve_access_token()
        .map_err(ClientError::Config)?;
    let authenticator: Arc<dyn Authenticator> =
        Arc::new(token.map(StaticToken::new).unwrap_or_else(StaticToken::missing));

    Ok(Box::new(GraphEventSource::new(source_config, authenticator)?))
}

#[cfg(not(feature = "graph"))]
fn graph_source(_config: &ClientConfig) -> ClientResult<Box<dyn EventSource>> {
    Err(ClientError::Config(
        "built without Microsoft Graph support, use --events-file".to_string(),
    ))
}
