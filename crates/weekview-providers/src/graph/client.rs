//! Microsoft Graph `calendarView` event source.
//!
//! Lists the signed-in user's events overlapping a window, asking Graph to
//! express wall-clock times in the viewer's zone. Continuation uses the
//! `@odata.nextLink` URL as the opaque cursor.

use std::sync::Arc;

use chrono::SecondsFormat;
use tracing::debug;
use url::Url;

use super::config::GraphConfig;
use super::wire::{classify_status, parse_page};
use crate::auth::Authenticator;
use crate::error::{EventSourceError, EventSourceResult};
use crate::source::{BoxFuture, CalendarQuery, EventPage, EventSource, PageCursor};

/// Source name used in errors and logs.
const SOURCE_NAME: &str = "graph";

/// Event source backed by Microsoft Graph.
pub struct GraphEventSource {
    http_client: reqwest::Client,
    config: GraphConfig,
    base: Url,
    authenticator: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for GraphEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEventSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GraphEventSource {
    /// Creates a new Graph source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: GraphConfig, authenticator: Arc<dyn Authenticator>) -> EventSourceResult<Self> {
        config
            .validate()
            .map_err(|e| EventSourceError::configuration(e).with_source_name(SOURCE_NAME))?;
        let base = config
            .base()
            .map_err(|e| EventSourceError::configuration(e).with_source_name(SOURCE_NAME))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                EventSourceError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source_name(SOURCE_NAME)
                    .with_cause(e)
            })?;

        Ok(Self {
            http_client,
            config,
            base,
            authenticator,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Builds the URL of the first page of `query`.
    fn first_page_url(&self, query: &CalendarQuery) -> EventSourceResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| EventSourceError::configuration("base_url cannot be a base"))?
            .pop_if_empty()
            .extend(["me", "calendarView"]);

        let top = query.page_size.min(self.config.page_size);
        url.query_pairs_mut()
            .append_pair(
                "startDateTime",
                &query.window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair(
                "endDateTime",
                &query.window.end().to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair("$top", &top.to_string())
            .append_pair("$select", &query.select.join(","))
            .append_pair("$orderby", "start/dateTime");

        Ok(url)
    }

    /// Resolves a cursor to a URL on the configured host.
    ///
    /// The bearer token is only ever sent to the configured origin.
    fn cursor_url(&self, cursor: &PageCursor) -> EventSourceResult<Url> {
        let url = Url::parse(cursor.as_str()).map_err(|e| {
            EventSourceError::invalid_response(format!("invalid continuation link: {}", e))
        })?;

        if url.origin() != self.base.origin() {
            return Err(EventSourceError::invalid_response(format!(
                "continuation link points to a different host: {}",
                url.host_str().unwrap_or("<none>")
            )));
        }

        Ok(url)
    }

    async fn fetch(&self, url: Url, query: &CalendarQuery) -> EventSourceResult<EventPage> {
        let token = self.authenticator.access_token().await?;

        debug!(url = %url, timezone = %query.preferred_timezone, "requesting calendar view page");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.secret())
            .header("Prefer", prefer_header(&query.preferred_timezone))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body, retry_after));
        }

        let body = response.text().await.map_err(|e| {
            EventSourceError::network(format!("failed to read response: {}", e)).with_cause(e)
        })?;

        parse_page(&body)
    }
}

impl EventSource for GraphEventSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn fetch_page<'a>(
        &'a self,
        query: &'a CalendarQuery,
        cursor: Option<&'a PageCursor>,
    ) -> BoxFuture<'a, EventSourceResult<EventPage>> {
        Box::pin(async move {
            let url = match cursor {
                None => self.first_page_url(query),
                Some(cursor) => self.cursor_url(cursor),
            };
            let result = match url {
                Ok(url) => self.fetch(url, query).await,
                Err(e) => Err(e),
            };
            result.map_err(|e| e.with_source_name(SOURCE_NAME))
        })
    }
}

/// `Prefer` header value selecting the zone of returned wall-clock times.
fn prefer_header(timezone: &str) -> String {
    format!("outlook.timezone=\"{}\"", timezone)
}

fn request_error(e: reqwest::Error) -> EventSourceError {
    if e.is_timeout() {
        EventSourceError::timeout("request timeout").with_cause(e)
    } else if e.is_connect() {
        EventSourceError::network(format!("connection failed: {}", e)).with_cause(e)
    } else {
        EventSourceError::network(format!("request failed: {}", e)).with_cause(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::error::SourceErrorCode;
    use chrono::{TimeZone, Utc};
    use weekview_core::TimeWindow;

    fn source(config: GraphConfig) -> GraphEventSource {
        GraphEventSource::new(config, Arc::new(StaticToken::new("token"))).unwrap()
    }

    fn query() -> CalendarQuery {
        CalendarQuery::new(
            TimeWindow::new(
                Utc.with_ymd_and_hms(2025, 8, 10, 7, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 8, 17, 7, 0, 0).unwrap(),
            ),
            "America/Los_Angeles",
        )
    }

    mod urls {
        use super::*;

        #[test]
        fn first_page_carries_window_and_projection() {
            let url = source(GraphConfig::new()).first_page_url(&query()).unwrap();

            assert_eq!(url.path(), "/v1.0/me/calendarView");
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            assert_eq!(
                pairs,
                vec![
                    ("startDateTime".into(), "2025-08-10T07:00:00Z".into()),
                    ("endDateTime".into(), "2025-08-17T07:00:00Z".into()),
                    ("$top".into(), "50".into()),
                    ("$select".into(), "subject,organizer,start,end".into()),
                    ("$orderby".into(), "start/dateTime".into()),
                ]
            );
        }

        #[test]
        fn page_size_is_the_smaller_of_query_and_config() {
            let graph = source(GraphConfig::new().with_page_size(25));
            let url = graph.first_page_url(&query()).unwrap();
            assert!(url.query().unwrap().contains("%24top=25"));

            let url = graph.first_page_url(&query().with_page_size(10)).unwrap();
            assert!(url.query().unwrap().contains("%24top=10"));
        }

        #[test]
        fn custom_base_url() {
            let graph = source(GraphConfig::new().with_base_url("http://127.0.0.1:9000/graph/"));
            let url = graph.first_page_url(&query()).unwrap();
            assert!(url.as_str().starts_with("http://127.0.0.1:9000/graph/me/calendarView?"));
        }

        #[test]
        fn cursor_on_same_host_is_followed() {
            let graph = source(GraphConfig::new());
            let cursor = PageCursor::new(
                "https://graph.microsoft.com/v1.0/me/calendarView?startDateTime=2025-08-10T07%3A00%3A00Z&%24skip=50",
            );
            let url = graph.cursor_url(&cursor).unwrap();
            assert_eq!(url.as_str(), cursor.as_str());
        }

        #[test]
        fn cursor_on_other_host_is_rejected() {
            let graph = source(GraphConfig::new());
            let err = graph
                .cursor_url(&PageCursor::new("https://evil.example.com/steal"))
                .unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::InvalidResponse);
            assert!(err.message().contains("evil.example.com"));
        }

        #[test]
        fn cursor_that_is_not_a_url() {
            let err = source(GraphConfig::new())
                .cursor_url(&PageCursor::new("offset:50"))
                .unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::InvalidResponse);
        }
    }

    #[test]
    fn prefer_header_quotes_zone() {
        assert_eq!(
            prefer_header("Pacific Standard Time"),
            "outlook.timezone=\"Pacific Standard Time\""
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = GraphEventSource::new(
            GraphConfig::new().with_base_url("mailto:someone@example.com"),
            Arc::new(StaticToken::new("token")),
        )
        .unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::Configuration);
        assert_eq!(err.source_name(), Some("graph"));
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let graph = GraphEventSource::new(
            GraphConfig::new().with_base_url("http://127.0.0.1:9"),
            Arc::new(StaticToken::missing()),
        )
        .unwrap();

        let err = graph.fetch_page(&query(), None).await.unwrap_err();

        assert!(err.is_auth_challenge());
        assert_eq!(err.source_name(), Some("graph"));
    }
}
