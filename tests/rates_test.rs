// Exchange rate fetching and publishing against mocked rate sources

use bcv_indicators::fetcher::{QuoteFormat, RatesFetcher};
use bcv_indicators::fetch_error::FetchError;
use bcv_indicators::services::{PublishError, RatesService};
use bcv_indicators::store::RatesRepository;

use mockito::{Server, ServerGuard};

fn fetcher_for(server: &ServerGuard) -> RatesFetcher {
    RatesFetcher::new(
        format!("{}/euro", server.url()),
        format!("{}/dolar", server.url()),
        format!("{}/paralelo", server.url()),
    )
}

async fn mock_json(server: &mut ServerGuard, path: &str, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_fetch_all_rates() {
    let mut server = Server::new_async().await;
    let eur = mock_json(&mut server, "/euro", 200, r#"{"tasa": "341,74", "fecha": "2026-01-09"}"#).await;
    let usd = mock_json(&mut server, "/dolar", 200, r#"{"tasa": 301.37, "fecha": "2026-01-09"}"#).await;
    let usdt = mock_json(
        &mut server,
        "/paralelo",
        200,
        r#"{"promedio": 520.5, "fechaActualizacion": "2026-01-09T13:00:00.000Z"}"#,
    )
    .await;

    let snapshot = fetcher_for(&server).fetch_all().await;

    let eur_rate = snapshot.eur.unwrap();
    assert_eq!(eur_rate.rate, 341.74);
    assert_eq!(eur_rate.symbol, "€");
    assert_eq!(snapshot.usd.unwrap().symbol, "$");
    let usdt_rate = snapshot.usdt.unwrap();
    assert_eq!(usdt_rate.symbol, "₮");
    assert_eq!(usdt_rate.date, "2026-01-09");

    eur.assert_async().await;
    usd.assert_async().await;
    usdt.assert_async().await;
}

#[tokio::test]
async fn test_failed_source_is_none() {
    let mut server = Server::new_async().await;
    let _euro = mock_json(&mut server, "/euro", 200, r#"{"tasa": 350.0}"#).await;
    let _dolar = mock_json(&mut server, "/dolar", 200, r#"{"tasa": 300.0}"#).await;
    let _paralelo = mock_json(&mut server, "/paralelo", 502, "Bad Gateway").await;

    let snapshot = fetcher_for(&server).fetch_all().await;

    assert!(snapshot.eur.is_some());
    assert!(snapshot.usd.is_some());
    assert!(snapshot.usdt.is_none());
}

#[tokio::test]
async fn test_fetch_rate_http_error() {
    let mut server = Server::new_async().await;
    let _euro = mock_json(&mut server, "/euro", 500, "").await;

    let fetcher = fetcher_for(&server);
    let result = fetcher
        .fetch_rate(&format!("{}/euro", server.url()), QuoteFormat::BcvApi, "€")
        .await;

    assert!(matches!(result, Err(FetchError::Request(_))));
}

#[tokio::test]
async fn test_publish_rates_file() {
    let mut server = Server::new_async().await;
    let _euro = mock_json(&mut server, "/euro", 200, r#"{"tasa": 350.12, "fecha": "2026-01-09"}"#).await;
    let _dolar = mock_json(&mut server, "/dolar", 200, r#"{"tasa": 300.5, "fecha": "2026-01-09"}"#).await;
    let _paralelo = mock_json(&mut server, "/paralelo", 404, "").await;

    let dir = tempfile::tempdir().unwrap();
    let repo = RatesRepository::new(dir.path());
    let service = RatesService::new(fetcher_for(&server), repo.clone());

    let document = service.refresh().await.unwrap();
    assert!(document.usdt.is_none());

    let raw = std::fs::read_to_string(repo.path()).unwrap();
    // Symbols are written as UTF-8, not \u escapes
    assert!(raw.contains("\"€\""));
    assert!(!raw.contains("usdt"));

    let reloaded = repo.load().await.unwrap().unwrap();
    assert_eq!(reloaded, document);
}

#[tokio::test]
async fn test_missing_usd_is_not_published() {
    let mut server = Server::new_async().await;
    let _euro = mock_json(&mut server, "/euro", 200, r#"{"tasa": 350.12}"#).await;
    let _dolar = mock_json(&mut server, "/dolar", 200, r#"{"fecha": "2026-01-09"}"#).await;
    let _paralelo = mock_json(&mut server, "/paralelo", 200, r#"{"promedio": 520.0}"#).await;

    let dir = tempfile::tempdir().unwrap();
    let repo = RatesRepository::new(dir.path());
    let service = RatesService::new(fetcher_for(&server), repo.clone());

    let result = service.refresh().await;
    assert!(matches!(result, Err(PublishError::MissingRate("USD"))));
    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_live_rates_flag_usdt() {
    let mut server = Server::new_async().await;
    let _euro = mock_json(&mut server, "/euro", 500, "").await;
    let _dolar = mock_json(&mut server, "/dolar", 200, r#"{"tasa": 300.5}"#).await;
    let _paralelo = mock_json(&mut server, "/paralelo", 200, r#"{"promedio": 520.0}"#).await;

    let dir = tempfile::tempdir().unwrap();
    let service = RatesService::new(fetcher_for(&server), RatesRepository::new(dir.path()));

    let live = service.live().await;
    assert!(live.eur.is_none());
    assert_eq!(live.usd.unwrap().live, None);
    assert_eq!(live.usdt.unwrap().live, Some(true));
}
