//! TMDB (The Movie Database) API provider
//!
//! Every call goes through `fetch`, which consults the shared
//! `ResponseCache` keyed by the full request URL (query string included)
//! before touching the network.
//!
//! API Flow:
//! 1. Search: /search/movie?query= → raw JSON passed through
//! 2. Details: /movie/{id} → parsed into `MovieDetail`
//! 3. Discover: /discover/movie?with_genres= → raw JSON passed through

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client as HttpClient, Url};

use crate::{
    cached,
    db::ResponseCache,
    error::{ProviderError, ProviderResult},
    models::{MovieDetail, Payload},
    services::providers::MovieProvider,
};

const PROVIDER_NAME: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    base_url: Url,
    cache: Arc<ResponseCache>,
    cache_ttl: Duration,
}

impl TmdbProvider {
    /// Creates a provider whose HTTP client enforces `timeout` on every request
    pub fn new(
        cache: Arc<ResponseCache>,
        api_key: String,
        api_url: &str,
        cache_ttl: Duration,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(api_url)
            .map_err(|e| anyhow::anyhow!("Invalid TMDB API URL {}: {}", api_url, e))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid TMDB API URL {}: not a base URL", api_url);
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
            cache,
            cache_ttl,
        })
    }

    /// Builds `{base}/{segments...}?api_key=..&params..`
    ///
    /// Segments and parameter values are percent-encoded.
    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        url
    }

    /// Returns the body for `url`, from cache when fresh, otherwise via one GET
    ///
    /// Failed requests are never cached.
    pub async fn fetch(&self, url: &Url) -> ProviderResult<Payload> {
        cached!(self.cache, url.as_str(), self.cache_ttl, self.download(url))
    }

    /// Like `fetch`, but a body is only cached once it parses as a `MovieDetail`
    async fn fetch_detail(&self, url: &Url, movie_id: &str) -> ProviderResult<MovieDetail> {
        let payload: ProviderResult<Payload> =
            cached!(self.cache, url.as_str(), self.cache_ttl, async {
                let payload = self.download(url).await?;
                parse_detail(movie_id, &payload)?;
                Ok::<_, ProviderError>(payload)
            });

        parse_detail(movie_id, &payload?)
    }

    async fn download(&self, url: &Url) -> ProviderResult<Payload> {
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::warn!(path = %url.path(), error = %e, "Provider request failed");
                ProviderError::Unreachable(format!("{}: {}", url.path(), e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path = %url.path(), status = %status, "Provider returned error status");
            return Err(ProviderError::BadResponse(format!(
                "{} returned status {}",
                url.path(),
                status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(path = %url.path(), error = %e, "Failed to read provider response");
            if e.is_timeout() {
                ProviderError::Unreachable(format!("{}: {}", url.path(), e))
            } else {
                ProviderError::BadResponse(format!("{}: {}", url.path(), e))
            }
        })?;

        tracing::info!(
            path = %url.path(),
            bytes = body.len(),
            provider = PROVIDER_NAME,
            "Provider request completed"
        );

        Ok(body.to_vec())
    }
}

fn parse_detail(movie_id: &str, payload: &[u8]) -> ProviderResult<MovieDetail> {
    MovieDetail::from_payload(payload).map_err(|e| {
        tracing::warn!(movie_id = %movie_id, error = %e, "Failed to parse movie details");
        ProviderError::BadResponse(format!("Failed to parse details for movie {}: {}", movie_id, e))
    })
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> ProviderResult<Payload> {
        let url = self.endpoint(&["search", "movie"], &[("query", query)]);
        self.fetch(&url).await
    }

    async fn movie_detail(&self, movie_id: &str) -> ProviderResult<MovieDetail> {
        let url = self.endpoint(&["movie", movie_id], &[]);
        self.fetch_detail(&url, movie_id).await
    }

    async fn discover_by_genre(&self, genre_id: i64) -> ProviderResult<Payload> {
        let genre = genre_id.to_string();
        let url = self.endpoint(&["discover", "movie"], &[("with_genres", genre.as_str())]);
        self.fetch(&url).await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Spawns a stand-in TMDB that counts every request it serves
    async fn spawn_stub() -> (String, Arc<AtomicUsize>) {
        async fn movie(
            State(hits): State<Arc<AtomicUsize>>,
            Path(id): Path<String>,
        ) -> axum::response::Response {
            hits.fetch_add(1, Ordering::SeqCst);
            match id.as_str() {
                "603" => Json(json!({
                    "id": 603,
                    "title": "The Matrix",
                    "release_date": "1999-03-30",
                    "genres": [{"id": 28, "name": "Action"}],
                    "poster_path": "/matrix.jpg",
                    "vote_average": 8.2
                }))
                .into_response(),
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({})).into_response()
                }
                "garbage" => "not json".into_response(),
                _ => (
                    StatusCode::NOT_FOUND,
                    Json(json!({"success": false, "status_code": 34})),
                )
                    .into_response(),
            }
        }

        async fn search(
            State(hits): State<Arc<AtomicUsize>>,
            Query(params): Query<HashMap<String, String>>,
        ) -> Json<serde_json::Value> {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "query": params.get("query"), "results": [] }))
        }

        async fn discover(
            State(hits): State<Arc<AtomicUsize>>,
            Query(params): Query<HashMap<String, String>>,
        ) -> Json<serde_json::Value> {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "with_genres": params.get("with_genres"), "results": [] }))
        }

        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/3/movie/:id", get(movie))
            .route("/3/search/movie", get(search))
            .route("/3/discover/movie", get(discover))
            .with_state(Arc::clone(&hits));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/3", addr), hits)
    }

    fn provider(api_url: &str) -> TmdbProvider {
        TmdbProvider::new(
            Arc::new(ResponseCache::new()),
            "test_key".to_string(),
            api_url,
            Duration::from_secs(600),
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_includes_api_key_and_encodes_query() {
        let provider = provider("https://api.themoviedb.org/3");
        let url = provider.endpoint(&["search", "movie"], &[("query", "the matrix & co")]);

        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/search/movie?api_key=test_key&query=the+matrix+%26+co"
        );
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let provider = provider("https://api.themoviedb.org/3/");
        let url = provider.endpoint(&["movie", "603"], &[]);

        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/603?api_key=test_key"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = TmdbProvider::new(
            Arc::new(ResponseCache::new()),
            "k".to_string(),
            "not a url",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_repeated_fetch_hits_network_once() {
        let (api_url, hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let first = provider.search_movies("matrix").await.unwrap();
        let second = provider.search_movies("matrix").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_queries_fetch_separately() {
        let (api_url, hits) = spawn_stub().await;
        let provider = provider(&api_url);

        provider.search_movies("alien").await.unwrap();
        provider.search_movies("aliens").await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_movie_detail_parses_fields() {
        let (api_url, _hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let detail = provider.movie_detail("603").await.unwrap();
        assert_eq!(detail.title, "The Matrix");
        assert_eq!(detail.genres[0].id, 28);
        assert_eq!(detail.poster_path.as_deref(), Some("/matrix.jpg"));
    }

    #[tokio::test]
    async fn test_error_status_is_bad_response_and_not_cached() {
        let (api_url, hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let first = provider.movie_detail("999999").await;
        let second = provider.movie_detail("999999").await;

        assert!(matches!(first, Err(ProviderError::BadResponse(_))));
        assert!(matches!(second, Err(ProviderError::BadResponse(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(provider.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_unparseable_detail_is_bad_response_and_not_cached() {
        let (api_url, hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let first = provider.movie_detail("garbage").await;
        let second = provider.movie_detail("garbage").await;

        assert!(matches!(first, Err(ProviderError::BadResponse(_))));
        assert!(matches!(second, Err(ProviderError::BadResponse(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(provider.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_valid_detail_served_from_cache() {
        let (api_url, hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let first = provider.movie_detail("603").await.unwrap();
        let second = provider.movie_detail("603").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let (api_url, _hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let result = provider.movie_detail("slow").await;
        assert!(matches!(result, Err(ProviderError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = provider(&format!("http://{}/3", addr));
        let result = provider.discover_by_genre(28).await;

        match result {
            Err(ProviderError::Unreachable(msg)) => assert!(!msg.contains("test_key")),
            other => panic!("expected Unreachable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_discover_passes_genre() {
        let (api_url, _hits) = spawn_stub().await;
        let provider = provider(&api_url);

        let payload = provider.discover_by_genre(28).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(body["with_genres"], "28");
    }
}
