use actix_web::{dev::ServerHandle, web, App, HttpRequest, HttpResponse, HttpServer};
use book_finder::{
    models::{SearchForm, SearchQuery},
    services::{MemoryStorage, OpenLibraryClient, QueryBuilder, SearchSource},
    view::{CardRenderer, ResultsView, ERROR_MESSAGE},
    Application, FinderError, SearchOutcome,
};
use serde_json::json;
use std::{collections::HashMap, net::TcpListener, sync::Arc};

/// Echoes the raw query string back as the title of a single document.
async fn echo(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "docs": [{"title": req.query_string(), "key": "/works/1"}],
        "numFound": 1
    }))
}

/// Fifty results served 24 at a time.
async fn paged(params: web::Query<HashMap<String, String>>) -> HttpResponse {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let start = (page - 1) * 24;
    let docs: Vec<_> = (start..50.min(start + 24))
        .map(|i| json!({"key": format!("/works/OL{}W", i), "title": format!("Book {}", i)}))
        .collect();
    HttpResponse::Ok().json(json!({"docs": docs, "numFound": 50}))
}

async fn unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().finish()
}

async fn shapeless() -> HttpResponse {
    HttpResponse::Ok().json(json!({"unexpected": true}))
}

async fn not_json() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body("<html>maintenance</html>")
}

/// Start the fake catalog on a random port and return its base URL.
fn start_catalog() -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(|| {
        App::new()
            .route("/search.json", web::get().to(echo))
            .route("/paged.json", web::get().to(paged))
            .route("/unavailable.json", web::get().to(unavailable))
            .route("/shapeless.json", web::get().to(shapeless))
            .route("/not-json.json", web::get().to(not_json))
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://127.0.0.1:{}", port), handle)
}

fn query(title: &str, subject: &str) -> SearchQuery {
    QueryBuilder::new(24).build(&SearchForm {
        title: title.to_string(),
        subject: subject.to_string(),
        ..Default::default()
    })
}

fn application(search_url: &str) -> Application {
    Application::new(
        Arc::new(OpenLibraryClient::new(search_url)),
        Arc::new(MemoryStorage::new()),
        QueryBuilder::new(24),
        CardRenderer::new("https://covers.openlibrary.org/b/id", "https://openlibrary.org"),
    )
}

#[actix_web::test]
async fn test_query_string_sent_to_catalog() {
    let (base, handle) = start_catalog();
    let client = OpenLibraryClient::new(&format!("{}/search.json", base));

    let page = client.search(&query("Harry Potter", "fantasy")).await.unwrap();

    assert_eq!(page.docs.len(), 1);
    assert_eq!(
        page.docs[0].title.as_deref(),
        Some("title=Harry+Potter&subject=fantasy&page=1&limit=24")
    );
    assert_eq!(page.total, 1);
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_submit_renders_single_card() {
    let (base, handle) = start_catalog();
    let app = application(&format!("{}/search.json", base));

    let outcome = app
        .submit_form(SearchForm {
            title: "Harry Potter".into(),
            subject: "fantasy".into(),
            ..Default::default()
        })
        .await;

    assert!(outcome.is_applied());
    let view = app.view();
    let cards = view.results.cards();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].link.href.ends_with("/works/1"));
    assert!(!view.load_more_visible);
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_paging_through_fifty_results() {
    let (base, handle) = start_catalog();
    let app = application(&format!("{}/paged.json", base));

    app.submit().await;
    assert_eq!(app.result_count(), 24);
    assert!(app.view().load_more_visible);

    app.load_more().await;
    assert_eq!(app.result_count(), 48);
    assert!(app.view().load_more_visible);

    app.load_more().await;
    assert_eq!(app.result_count(), 50);
    let view = app.view();
    assert!(!view.load_more_visible);
    assert_eq!(view.status, "50 results • Page 3");
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_error_status_is_request_failed() {
    let (base, handle) = start_catalog();
    let client = OpenLibraryClient::new(&format!("{}/unavailable.json", base));

    let err = client.search(&query("Dune", "")).await.unwrap_err();

    assert!(matches!(err, FinderError::RequestFailed { status: 503 }));
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_missing_docs_field_is_soft() {
    let (base, handle) = start_catalog();
    let client = OpenLibraryClient::new(&format!("{}/shapeless.json", base));

    let page = client.search(&query("Dune", "")).await.unwrap();

    assert!(page.docs.is_empty());
    assert_eq!(page.total, 0);
    assert!(matches!(page.anomaly, Some(FinderError::DecodeAnomaly(_))));
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_non_json_body_fails_the_search() {
    let (base, handle) = start_catalog();
    let client = OpenLibraryClient::new(&format!("{}/not-json.json", base));

    let err = client.search(&query("Dune", "")).await.unwrap_err();
    assert!(matches!(err, FinderError::DecodeAnomaly(_)));
    handle.stop(false).await;
}

#[actix_web::test]
async fn test_unreachable_catalog_shows_inline_message() {
    // Bind then drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let app = application(&format!("http://127.0.0.1:{}/search.json", port));

    let outcome = app.submit().await;

    assert!(matches!(
        outcome,
        SearchOutcome::Failed(FinderError::Transport(_))
    ));
    assert_eq!(
        app.view().results,
        ResultsView::Message(ERROR_MESSAGE.to_string())
    );
    assert!(!app.is_busy());
}
