mod common;

use common::{settings, setup, EchoModel, FailingModel, FakeGateway};
use marketbrief::config::Settings;
use marketbrief::domain::entities::snapshot::TickerSnapshot;
use marketbrief::domain::error::{DomainError, RejectionReason};
use marketbrief::domain::values::data_point::DataPoint;
use marketbrief::domain::values::intent::Intent;
use marketbrief::MarketBrief;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
}

#[tokio::test]
async fn test_price_lookup_fetches_latest_trade_once() {
    let gw = Arc::new(FakeGateway::new(&[("MSFT", 415.5)]));
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let answer = mb.ask("Get the latest price of Microsoft").await.unwrap();

    assert_eq!(answer.interpretation.intent, Intent::PriceLookup);
    assert_eq!(gw.calls_to("last_trade"), vec!["last_trade:MSFT"]);
    assert!(gw.calls_to("aggregates").is_empty());
    assert!(gw.calls_to("news").is_empty());
    assert!(answer.report.body.contains("$415.50"));
    assert!(!answer.report.is_degraded());
    assert_eq!(answer.report.title, "MSFT Price Check");
}

#[tokio::test]
async fn test_comparison_keeps_ticker_order() {
    let gw = Arc::new(FakeGateway::new(&[("TSLA", 250.0), ("NVDA", 900.0)]));
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let answer = mb.ask("Compare TSLA and NVDA performance").await.unwrap();

    assert_eq!(answer.interpretation.intent, Intent::Comparison);
    assert_eq!(gw.calls_to("aggregates").len(), 2);
    let order: Vec<&str> = answer.snapshots.iter().map(|s| s.ticker().as_str()).collect();
    assert_eq!(order, vec!["TSLA", "NVDA"]);
    let body = &answer.report.body;
    assert!(position(body, "### TSLA") < position(body, "### NVDA"));
    assert_eq!(answer.report.title, "TSLA vs NVDA Comparison");
}

#[tokio::test]
async fn test_slow_first_ticker_does_not_reorder_or_serialize() {
    let gw = Arc::new(
        FakeGateway::new(&[("TSLA", 250.0), ("NVDA", 900.0)])
            .with_delay("TSLA", Duration::from_millis(400))
            .with_delay("NVDA", Duration::from_millis(200)),
    );
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let started = Instant::now();
    let answer = mb.ask("Compare TSLA and NVDA performance").await.unwrap();
    let elapsed = started.elapsed();

    // NVDA answers first, the snapshots still follow the query.
    assert_eq!(gw.calls_to("aggregates"), vec!["aggregates:NVDA", "aggregates:TSLA"]);
    let order: Vec<&str> = answer.snapshots.iter().map(|s| s.ticker().as_str()).collect();
    assert_eq!(order, vec!["TSLA", "NVDA"]);
    assert!(answer.snapshots.iter().all(|s| s.snapshot().is_some()));
    assert!(elapsed < Duration::from_millis(600), "calls did not overlap: {elapsed:?}");
}

#[tokio::test]
async fn test_hanging_ticker_times_out_others_populate() {
    let gw = Arc::new(
        FakeGateway::new(&[("TSLA", 250.0), ("NVDA", 900.0)])
            .with_delay("TSLA", Duration::from_secs(1)),
    );
    let settings = Settings {
        fetch_timeout: Duration::from_millis(100),
        ..settings()
    };
    let mb = MarketBrief::with_providers(settings, gw.clone(), Arc::new(EchoModel::new()));

    let answer = mb.ask("Compare TSLA and NVDA").await.unwrap();

    assert!(matches!(
        &answer.snapshots[0],
        TickerSnapshot::Unavailable { ticker, reason }
            if ticker.as_str() == "TSLA" && reason == "request timed out"
    ));
    assert!(answer.snapshots[1].snapshot().is_some());
    assert!(gw.calls_to("company").iter().all(|c| c != "company:TSLA"));
    assert!(answer.report.body.contains("- status: UNAVAILABLE (request timed out)"));
}

#[tokio::test]
async fn test_rate_limited_ticker_is_unavailable_others_populate() {
    let gw = Arc::new(
        FakeGateway::new(&[("TSLA", 250.0), ("NVDA", 900.0)]).with_failure("NVDA", 429),
    );
    let mb = setup(gw, Arc::new(EchoModel::new()));

    let answer = mb.ask("Compare TSLA and NVDA").await.unwrap();

    assert!(matches!(
        &answer.snapshots[1],
        TickerSnapshot::Unavailable { ticker, reason }
            if ticker.as_str() == "NVDA" && reason == "rate limited by the data provider"
    ));
    let tsla = answer.snapshots[0].snapshot().expect("TSLA should be found");
    assert!(tsla.company.is_available());
    assert!(tsla.previous_close.is_available());
    assert!(tsla.daily_bars.is_available());
    let body = &answer.report.body;
    assert!(body.contains("### NVDA\n- status: UNAVAILABLE (rate limited by the data provider)"));
}

#[tokio::test]
async fn test_server_error_reports_status_code() {
    let gw = Arc::new(FakeGateway::new(&[("AAPL", 190.0)]).with_failure("AAPL", 503));
    let mb = setup(gw, Arc::new(EchoModel::new()));

    let answer = mb.ask("AAPL price").await.unwrap();

    assert!(matches!(
        &answer.snapshots[0],
        TickerSnapshot::Unavailable { reason, .. } if reason == "service error (HTTP 503)"
    ));
}

#[tokio::test]
async fn test_overlong_query_is_invalid_input() {
    let gw = Arc::new(FakeGateway::new(&[("AAPL", 190.0)]));
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let err = mb.ask(&"AAPL price ".repeat(60)).await.unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert!(err.to_string().contains("500"));
    assert!(gw.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_ticker_marked_not_found_others_populate() {
    let gw = Arc::new(FakeGateway::new(&[("AAPL", 190.0)]));
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let answer = mb.ask("Compare AAPL and ZZZZ").await.unwrap();

    assert!(matches!(&answer.snapshots[1], TickerSnapshot::NotFound { ticker } if ticker.as_str() == "ZZZZ"));
    let aapl = answer.snapshots[0].snapshot().expect("AAPL should be found");
    assert!(aapl.company.is_available());
    assert!(aapl.previous_close.is_available());
    assert!(aapl.daily_bars.is_available());
    assert!(answer.report.body.contains("### ZZZZ\n- status: NOT FOUND"));
    assert!(answer.report.body.contains("period start close: $180.00"));
}

#[tokio::test]
async fn test_plan_restricted_trade_is_unavailable_not_zero() {
    let gw = Arc::new(FakeGateway::new(&[("AAPL", 190.0)]).with_trade_error(403));
    let mb = setup(gw, Arc::new(EchoModel::new()));

    let answer = mb.ask("What's the price of AAPL?").await.unwrap();

    let snap = answer.snapshots[0].snapshot().unwrap();
    assert_eq!(
        snap.last_trade,
        DataPoint::Unavailable("not included in the market-data plan".into())
    );
    assert!(snap.previous_close.is_available());
    let body = &answer.report.body;
    assert!(body.contains("last trade price: UNAVAILABLE (not included in the market-data plan)"));
    assert!(body.contains("previous close: $189.50"));
    assert!(!body.contains("$0.00"));
}

#[tokio::test]
async fn test_deep_dive_fetches_everything() {
    let gw = Arc::new(FakeGateway::new(&[("NVDA", 900.0)]));
    let model = Arc::new(EchoModel::new());
    let mb = setup(gw.clone(), model.clone());

    let answer = mb.ask("Give me a deep dive on NVDA").await.unwrap();

    assert_eq!(answer.interpretation.intent, Intent::DeepDive);
    for endpoint in ["company", "last_trade", "previous_close", "aggregates", "news"] {
        assert_eq!(gw.calls_to(endpoint).len(), 1, "{endpoint}");
    }
    let prompt = model.last_prompt().unwrap();
    assert!(prompt.user.contains("headline 3: NVDA headline 3"));
    assert!(!prompt.user.contains("headline 4"));
    assert!(prompt.user.contains("description: NVDA makes things."));
}

#[tokio::test]
async fn test_empty_news_is_marked_unavailable() {
    let gw = Arc::new(FakeGateway::new(&[("META", 480.0)]).without_news());
    let mb = setup(gw, Arc::new(EchoModel::new()));

    let answer = mb.ask("Any news about Meta?").await.unwrap();

    assert_eq!(answer.interpretation.intent, Intent::News);
    assert!(answer.report.body.contains("news: UNAVAILABLE (no recent articles)"));
}

#[tokio::test]
async fn test_no_ticker_is_terminal() {
    let gw = Arc::new(FakeGateway::new(&[("AAPL", 190.0)]));
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let err = mb.ask("How is the stock market doing?").await.unwrap_err();

    assert!(matches!(err, DomainError::TickerNotFound));
    assert!(err.to_string().contains("Please mention a stock ticker"));
    assert!(gw.calls().is_empty());
}

#[tokio::test]
async fn test_off_topic_makes_no_calls() {
    let gw = Arc::new(FakeGateway::new(&[("AAPL", 190.0)]));
    let mb = setup(gw.clone(), Arc::new(EchoModel::new()));

    let err = mb.ask("Tell me a joke about cats").await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::Rejected(RejectionReason::NotFinanceRelated)
    ));
    assert!(gw.calls().is_empty());
}

#[tokio::test]
async fn test_all_unknown_skips_the_model() {
    let gw = Arc::new(FakeGateway::new(&[]));
    let model = Arc::new(EchoModel::new());
    let mb = setup(gw, model.clone());

    let answer = mb.ask("ZZZZ stock price").await.unwrap();

    assert!(answer.report.is_degraded());
    assert!(answer.report.body.contains("Ticker not found."));
    assert!(model.last_prompt().is_none());
}

#[tokio::test]
async fn test_model_failure_still_answers() {
    let gw = Arc::new(FakeGateway::new(&[("AMZN", 180.25)]));
    let mb = setup(gw, Arc::new(FailingModel));

    let answer = mb.ask("AMZN price").await.unwrap();

    assert!(answer.report.is_degraded());
    assert!(answer.report.body.contains("**Last Trade:** $180.25"));
}

#[tokio::test]
async fn test_market_status() {
    let gw = Arc::new(FakeGateway::new(&[]));
    let mb = setup(gw, Arc::new(EchoModel::new()));

    let status = mb.market_status().await.unwrap();

    assert_eq!(status.market, "open");
    assert_eq!(status.exchanges.len(), 3);
}
