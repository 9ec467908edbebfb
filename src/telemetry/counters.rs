//! Prometheus counters for the rate engine and HTTP surface.
//!
//! Counters are registered once into the default registry by [`init`] and
//! held behind `OnceLock`s; recording functions are no-ops until then, so
//! core code can record unconditionally and tests need no metrics setup.

use prometheus::{IntCounter, IntCounterVec, Opts};
use std::sync::OnceLock;

use crate::rates::MatchType;

static RATE_QUERIES_TOTAL: OnceLock<IntCounter> = OnceLock::new();
static RATE_QUERIES_REJECTED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
static RATE_RESULTS_TOTAL: OnceLock<IntCounter> = OnceLock::new();
static MATCHES_FOUND_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
static MATCH_CACHE_HITS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Register all counters into the default registry.
///
/// Safe to call more than once; re-registration is ignored.
pub fn init() {
    if let Ok(c) = IntCounter::new(
        "courierd_rate_queries_total",
        "Total rate queries received",
    ) {
        let _ = prometheus::register(Box::new(c.clone()));
        let _ = RATE_QUERIES_TOTAL.set(c);
    }

    if let Ok(c) = IntCounterVec::new(
        Opts::new(
            "courierd_rate_queries_rejected_total",
            "Rate queries rejected, by reason",
        ),
        &["reason"],
    ) {
        let _ = prometheus::register(Box::new(c.clone()));
        let _ = RATE_QUERIES_REJECTED_TOTAL.set(c);
    }

    if let Ok(c) = IntCounter::new(
        "courierd_rate_results_total",
        "Priced results returned across all queries",
    ) {
        let _ = prometheus::register(Box::new(c.clone()));
        let _ = RATE_RESULTS_TOTAL.set(c);
    }

    if let Ok(c) = IntCounterVec::new(
        Opts::new(
            "courierd_matches_found_total",
            "Location matches found, by match type",
        ),
        &["match_type"],
    ) {
        let _ = prometheus::register(Box::new(c.clone()));
        let _ = MATCHES_FOUND_TOTAL.set(c);
    }

    if let Ok(c) = IntCounter::new(
        "courierd_match_cache_hits_total",
        "Country match cache hits",
    ) {
        let _ = prometheus::register(Box::new(c.clone()));
        let _ = MATCH_CACHE_HITS_TOTAL.set(c);
    }
}

pub fn rate_query() {
    if let Some(c) = RATE_QUERIES_TOTAL.get() {
        c.inc();
    }
}

pub fn rate_query_rejected(reason: &str) {
    if let Some(c) = RATE_QUERIES_REJECTED_TOTAL.get() {
        c.with_label_values(&[reason]).inc();
    }
}

pub fn rate_results(count: usize) {
    if let Some(c) = RATE_RESULTS_TOTAL.get() {
        c.inc_by(count as u64);
    }
}

pub fn matches_found(match_type: MatchType, count: usize) {
    if count == 0 {
        return;
    }
    if let Some(c) = MATCHES_FOUND_TOTAL.get() {
        let label = match match_type {
            MatchType::Direct => "direct",
            MatchType::Zone => "zone",
        };
        c.with_label_values(&[label]).inc_by(count as u64);
    }
}

pub fn match_cache_hit() {
    if let Some(c) = MATCH_CACHE_HITS_TOTAL.get() {
        c.inc();
    }
}
