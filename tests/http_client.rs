use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use reelview::api::{fetch_credentials, AccountApi, HttpAccountApi};
use reelview::config::Config;
use reelview::embedded::EmbeddedData;
use reelview::pages::MovieDetailPage;
use reelview::rating::Rating;
use reelview::toggle::{ToggleButton, ToggleKind};
use reelview::widgets::{RatingWidget, SubmitOutcome};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct MockHost {
    session_id: String,
    fail_posts: bool,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHost {
    fn new() -> Self {
        Self {
            session_id: "sess-1".to_string(),
            fail_posts: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn find(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

async fn handle(
    State(host): State<MockHost>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    host.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match (method.as_str(), uri.path()) {
        ("GET", "/api/logged_in") => (StatusCode::OK, Json(json!({ "logged_in": true }))),
        ("GET", "/api/session_id") => (
            StatusCode::OK,
            Json(json!({ "session_id": host.session_id })),
        ),
        ("GET", "/api/token") => (StatusCode::OK, Json(json!({ "access_token": "tok-1" }))),
        ("POST", _) if host.fail_posts => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "boom" })),
        ),
        ("POST", "/rate_movie/" | "/watchlist_movie/" | "/favorite_movie/") => {
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        ("DELETE", path) if path.starts_with("/3/movie/") && path.ends_with("/rating") => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status_code": 13,
                "status_message": "The item/record was deleted successfully."
            })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn spawn_host(host: MockHost) -> HttpAccountApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(host);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let base = format!("http://{addr}");
    HttpAccountApi::new(Config::new(&base, &format!("{base}/3"))).unwrap()
}

#[tokio::test]
async fn reads_auth_status_and_credentials() {
    let host = MockHost::new();
    let api = spawn_host(host.clone()).await;

    assert!(api.logged_in().await.unwrap());
    let credentials = fetch_credentials(&api).await.unwrap();
    assert_eq!(credentials.session_id, "sess-1");
    assert_eq!(credentials.access_token, "tok-1");
}

#[tokio::test]
async fn rating_posts_integer_body() {
    let host = MockHost::new();
    let api = spawn_host(host.clone()).await;

    let mut widget = RatingWidget::new(42, None);
    let outcome = widget.rate(3, &api).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Confirmed);
    assert!(widget.has_delete_button());

    let posts = host.find("POST", "/rate_movie/");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].body, json!({ "movie_id": 42, "rating": 8 }));
}

#[tokio::test]
async fn toggles_post_their_new_state() {
    let host = MockHost::new();
    let api = spawn_host(host.clone()).await;

    let mut watchlist = ToggleButton::new(7, ToggleKind::Watchlist, false);
    let mut favorite = ToggleButton::new(7, ToggleKind::Favorite, true);
    assert!(watchlist.toggle(&api).await.is_confirmed());
    assert!(favorite.toggle(&api).await.is_confirmed());

    assert_eq!(
        host.find("POST", "/watchlist_movie/")[0].body,
        json!({ "movie_id": 7, "watchlist": true })
    );
    assert_eq!(
        host.find("POST", "/favorite_movie/")[0].body,
        json!({ "movie_id": 7, "favorite": false })
    );
}

#[tokio::test]
async fn server_error_fails_without_rollback() {
    let host = MockHost {
        fail_posts: true,
        ..MockHost::new()
    };
    let api = spawn_host(host.clone()).await;

    let mut button = ToggleButton::new(7, ToggleKind::Favorite, false);
    assert_eq!(button.toggle(&api).await, SubmitOutcome::Failed);
    assert!(button.is_active());
    assert_eq!(button.label(), "Unfavorite");

    let mut widget = RatingWidget::new(7, None);
    assert_eq!(widget.rate(0, &api).await.unwrap(), SubmitOutcome::Failed);
    assert!(!widget.has_delete_button());

    let err = api
        .rate_movie(7, Rating::from_whole(2).unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("HTTP status 500"));
}

#[tokio::test]
async fn delete_calls_tmdb_with_bearer_and_session() {
    let host = MockHost::new();
    let api = spawn_host(host.clone()).await;

    let mut widget = RatingWidget::new(42, Some(Rating::from_whole(8).unwrap()));
    assert_eq!(widget.delete_rating(&api).await, SubmitOutcome::Confirmed);
    assert!(widget.stars().iter().all(|s| !s.filled));
    assert!(!widget.has_delete_button());

    let deletes = host.find("DELETE", "/3/movie/42/rating");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].query.as_deref(), Some("session_id=sess-1"));
    assert_eq!(deletes[0].authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn empty_session_id_blocks_the_delete_request() {
    let host = MockHost {
        session_id: String::new(),
        ..MockHost::new()
    };
    let api = spawn_host(host.clone()).await;

    let mut widget = RatingWidget::new(42, Some(Rating::from_whole(8).unwrap()));
    assert_eq!(widget.delete_rating(&api).await, SubmitOutcome::Failed);
    assert!(host.requests().iter().all(|r| r.method != "DELETE"));
    assert!(widget.has_delete_button());
}

#[tokio::test]
async fn detail_page_loads_over_http() {
    let host = MockHost::new();
    let api = spawn_host(host.clone()).await;

    let html = r#"<html><body>
<script id="movie-details" type="application/json">{"id": 42, "title": "Answer", "release_date": "2001-09-10", "vote_average": 7, "poster_path": "/p.jpg", "backdrop_path": "/b.jpg", "genres": [{"id": 1, "name": "Drama"}], "tagline": "T", "overview": "O"}</script>
<script id="account-states" type="application/json">{"id": 42, "favorite": false, "rated": false, "watchlist": false}</script>
<script id="movie-cast" type="application/json">{"cast": [{"id": 5, "name": "Ann", "character": "Pilot", "profile_path": null}]}</script>
<script id="media-items" type="application/json">{"results": [{"key": "abc", "site": "YouTube"}]}</script>
</body></html>"#;
    let data = EmbeddedData::from_html(html);
    let mut page = MovieDetailPage::load(&data, &api).await.unwrap();
    assert_eq!(host.find("GET", "/api/logged_in").len(), 1);

    page.rate(3, &api).await.unwrap();
    let banner = page.fragments()[0].to_html();
    assert_eq!(banner.matches("color: gold").count(), 4);
    assert_eq!(banner.matches("delete-rating-button").count(), 1);
    assert!(banner.contains("September 10th, 2001 | Rated 7 | Drama"));
}
