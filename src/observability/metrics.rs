//! Client metrics.
//!
//! # Metrics
//! - `ledger_transactions_total` (counter): submissions by method and precheck status
//! - `ledger_receipt_wait_seconds` (histogram): time from submit to final receipt
//! - `ledger_query_cost_tinybars` (histogram): cost quoted for paid queries
//! - `ledger_topic_messages_total` (counter): messages delivered to subscriptions

use std::time::Instant;

pub fn record_transaction(method: &'static str, status: &str) {
    metrics::counter!(
        "ledger_transactions_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_receipt_wait(start: Instant) {
    metrics::histogram!("ledger_receipt_wait_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_query_cost(method: &'static str, tinybars: u64) {
    metrics::histogram!("ledger_query_cost_tinybars", "method" => method).record(tinybars as f64);
}

pub fn record_topic_message() {
    metrics::counter!("ledger_topic_messages_total").increment(1);
}
