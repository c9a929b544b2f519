use autotrade_core::prelude::*;
use rust_decimal_macros::dec;

fn book() -> DefaultOrderBook {
    DefaultOrderBook::new("AUTOTRAD Equity")
}

fn fills(responses: &[EngineResponse]) -> Vec<&FillOrderResponse> {
    responses
        .iter()
        .filter_map(|r| match r {
            EngineResponse::FillOrderResponse(f) => Some(f),
            _ => None,
        })
        .collect()
}

/// Scenario 1 (spec §8): immediate cross, both sides filled completely.
#[test]
fn immediate_cross_fills_both_sides_completely() {
    let mut b = book();
    b.create_order_request(Uuid::nil(), "seed".to_string(), Side::Sell, 10, dec!(100));
    let responses = b.create_order_request(Uuid::nil(), "buyer".to_string(), Side::Buy, 10, dec!(100));

    let fs = fills(&responses);
    assert_eq!(fs.len(), 2);
    assert_eq!(fs[0].trade.quantity, 10);
    assert_eq!(fs[0].trade.limit_price, dec!(100));
    assert_eq!(fs[0].trade.fill_type, FillType::Complete);
    assert_eq!(fs[1].trade.quantity, 10);
    assert_eq!(fs[1].trade.fill_type, FillType::Complete);
    assert_eq!(fs[0].trade.trade_id, fs[1].trade.trade_id);
    assert_eq!(fs[0].order_params.status, OrderStatus::Filled);
    assert_eq!(fs[1].order_params.status, OrderStatus::Filled);
    assert_eq!(b.bid_levels().len(), 0);
    assert_eq!(b.ask_levels().len(), 0);
}

/// Scenario 2 (spec §8): partial sweep across two price levels.
#[test]
fn partial_sweep_across_two_price_levels() {
    let mut b = book();
    b.create_order_request(Uuid::nil(), "ask1".to_string(), Side::Sell, 10, dec!(101));
    b.create_order_request(Uuid::nil(), "ask2".to_string(), Side::Sell, 5, dec!(102));

    let responses = b.create_order_request(Uuid::nil(), "buyer".to_string(), Side::Buy, 12, dec!(102));
    let fs = fills(&responses);
    assert_eq!(fs.len(), 4);
    assert_eq!(fs[0].trade.quantity, 10);
    assert_eq!(fs[0].trade.limit_price, dec!(102));
    assert_eq!(fs[0].trade.fill_type, FillType::Partial);
    assert_eq!(fs[1].trade.quantity, 10);
    assert_eq!(fs[1].trade.fill_type, FillType::Complete);
    assert_eq!(fs[2].trade.quantity, 2);
    assert_eq!(fs[2].trade.fill_type, FillType::Complete);
    assert_eq!(fs[3].trade.quantity, 2);
    assert_eq!(fs[3].trade.fill_type, FillType::Partial);

    let remaining = b.ask_levels();
    assert_eq!(
        remaining,
        vec![PriceLevel {
            price: dec!(102),
            open_quantity: 3
        }]
    );
}

/// Scenario 3 (spec §8): revising an order resets its timestamp, losing
/// time priority to a same-price order that arrived later but was never
/// touched.
#[test]
fn revise_loses_time_priority() {
    let mut b = book();
    let resp_a = b.create_order_request(Uuid::nil(), "a".to_string(), Side::Buy, 5, dec!(100));
    let order_a_id = match &resp_a[0] {
        EngineResponse::OrderResponse(r) => r.order_params.as_ref().unwrap().exch_order_id,
        _ => panic!("expected order response"),
    };
    let resp_b = b.create_order_request(Uuid::nil(), "b".to_string(), Side::Buy, 5, dec!(100));
    let order_b_id = match &resp_b[0] {
        EngineResponse::OrderResponse(r) => r.order_params.as_ref().unwrap().exch_order_id,
        _ => panic!("expected order response"),
    };

    b.revise_order_request(Uuid::nil(), "a".to_string(), order_a_id, Some(7), None);

    let responses = b.create_order_request(Uuid::nil(), "seller".to_string(), Side::Sell, 1, dec!(100));
    let fs = fills(&responses);
    assert_eq!(fs[1].order_params.exch_order_id, order_b_id);
}

#[test]
fn unknown_order_revise_is_rejected_without_mutation() {
    let mut b = book();
    let responses = b.revise_order_request(Uuid::nil(), "x".to_string(), 999, Some(1), None);
    match &responses[0] {
        EngineResponse::OrderResponse(r) => {
            assert!(!r.status);
            assert!(r.order_params.is_none());
        }
        _ => panic!("expected order response"),
    }
}

#[test]
fn completed_order_cannot_be_revised() {
    let mut b = book();
    let resp = b.create_order_request(Uuid::nil(), "a".to_string(), Side::Buy, 5, dec!(100));
    let order_id = match &resp[0] {
        EngineResponse::OrderResponse(r) => r.order_params.as_ref().unwrap().exch_order_id,
        _ => panic!(),
    };
    b.cancel_order_request(Uuid::nil(), "a".to_string(), order_id);
    let responses = b.revise_order_request(Uuid::nil(), "a".to_string(), order_id, Some(1), None);
    match &responses[0] {
        EngineResponse::OrderResponse(r) => assert!(!r.status),
        _ => panic!(),
    }
}

#[test]
fn completed_order_cannot_be_cancelled_again() {
    let mut b = book();
    let resp = b.create_order_request(Uuid::nil(), "a".to_string(), Side::Buy, 5, dec!(100));
    let order_id = match &resp[0] {
        EngineResponse::OrderResponse(r) => r.order_params.as_ref().unwrap().exch_order_id,
        _ => panic!(),
    };
    b.cancel_order_request(Uuid::nil(), "a".to_string(), order_id);
    let responses = b.cancel_order_request(Uuid::nil(), "a".to_string(), order_id);
    match &responses[0] {
        EngineResponse::OrderResponse(r) => assert!(!r.status),
        _ => panic!(),
    }
}

#[test]
fn no_resting_cross_after_a_completed_request() {
    let mut b = book();
    b.create_order_request(Uuid::nil(), "bidder".to_string(), Side::Buy, 5, dec!(99));
    b.create_order_request(Uuid::nil(), "asker".to_string(), Side::Sell, 5, dec!(101));

    let bids = b.bid_levels();
    let asks = b.ask_levels();
    assert!(bids[0].price < asks[0].price);
}
