mod common;

use common::{setup, ticker, EchoModel, FakeGateway};
use marketbrief::domain::error::{DomainError, RejectionReason};
use marketbrief::domain::values::intent::Intent;
use marketbrief::MarketBrief;
use std::sync::Arc;

fn brief() -> MarketBrief {
    setup(Arc::new(FakeGateway::new(&[])), Arc::new(EchoModel::new()))
}

fn symbols(mb: &MarketBrief, text: &str) -> Vec<String> {
    mb.interpret(text)
        .unwrap()
        .tickers
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn test_company_name_maps_to_ticker() {
    let mb = brief();
    let i = mb.interpret("Get the latest price of Microsoft").unwrap();
    assert_eq!(i.tickers.iter().cloned().collect::<Vec<_>>(), vec![ticker("MSFT")]);
    assert_eq!(i.intent, Intent::PriceLookup);
    assert_eq!(i.horizon, None);
}

#[test]
fn test_two_tickers_keep_text_order() {
    let mb = brief();
    let i = mb.interpret("Compare TSLA and NVDA performance").unwrap();
    assert_eq!(symbols(&mb, "Compare TSLA and NVDA performance"), vec!["TSLA", "NVDA"]);
    assert_eq!(i.intent, Intent::Comparison);
}

#[test]
fn test_two_tickers_force_comparison() {
    let mb = brief();
    assert_eq!(mb.interpret("TSLA vs NVDA").unwrap().intent, Intent::Comparison);
    // News and deep-dive words lose to a second ticker.
    assert_eq!(
        mb.interpret("AAPL and MSFT news analysis").unwrap().intent,
        Intent::Comparison
    );
}

#[test]
fn test_comparison_keyword_beats_news() {
    let mb = brief();
    let i = mb.interpret("compare AAPL price and news").unwrap();
    assert_eq!(i.intent, Intent::Comparison);
    assert_eq!(symbols(&mb, "compare AAPL price and news"), vec!["AAPL"]);
}

#[test]
fn test_news_and_deep_dive_intents() {
    let mb = brief();
    assert_eq!(mb.interpret("Latest news on Tesla").unwrap().intent, Intent::News);
    let i = mb.interpret("Deep dive on NVDA over the last 6 months").unwrap();
    assert_eq!(i.intent, Intent::DeepDive);
    assert_eq!(i.horizon.map(|h| h.as_days()), Some(180));
}

#[test]
fn test_repeated_ticker_appears_once() {
    let mb = brief();
    assert_eq!(
        symbols(&mb, "AAPL price? I mean AAPL, the AAPL stock, Apple"),
        vec!["AAPL"]
    );
}

#[test]
fn test_lowercase_words_are_not_tickers() {
    let mb = brief();
    let i = mb.interpret("what is the stock price of it").unwrap();
    assert!(i.tickers.is_empty());
    assert_eq!(i.intent, Intent::PriceLookup);
}

#[test]
fn test_stop_words_and_cashtags() {
    let mb = brief();
    assert_eq!(symbols(&mb, "Is AI a good stock? What does the CEO of $F say"), vec!["F"]);
}

#[test]
fn test_off_topic_query_rejected() {
    let mb = brief();
    let err = mb.interpret("What's the weather like in Paris tomorrow?").unwrap_err();
    assert!(matches!(
        err,
        DomainError::Rejected(RejectionReason::NotFinanceRelated)
    ));
}

#[test]
fn test_empty_query_rejected() {
    let mb = brief();
    let err = mb.interpret("   ").unwrap_err();
    assert!(matches!(err, DomainError::Rejected(RejectionReason::EmptyQuery)));
}
