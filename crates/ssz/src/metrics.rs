// crates/ssz/src/metrics.rs

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

use crate::error::SszError;

fn counter_vec(name: &str, help: &str) -> Option<IntCounterVec> {
    let c = IntCounterVec::new(Opts::new(name, help), &["kind"]).ok()?;
    if let Err(e) = prometheus::register(Box::new(c.clone())) {
        log::warn!("metric {name} not registered: {e}");
    }
    Some(c)
}

pub static DECODE_REJECTED: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    counter_vec(
        "beacon_ssz_decode_rejected_total",
        "Decodes rejected, by error kind",
    )
});

pub static ENCODE_REJECTED: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    counter_vec(
        "beacon_ssz_encode_rejected_total",
        "Encodes rejected, by error kind",
    )
});

pub static ROOTS_TOTAL: Lazy<Option<IntCounter>> = Lazy::new(|| {
    let c = IntCounter::new("beacon_ssz_roots_total", "Container roots computed").ok()?;
    if let Err(e) = prometheus::register(Box::new(c.clone())) {
        log::warn!("metric beacon_ssz_roots_total not registered: {e}");
    }
    Some(c)
});

#[inline]
pub fn decode_rejected(err: &SszError) {
    if let Some(c) = DECODE_REJECTED.as_ref() {
        c.with_label_values(&[err.kind()]).inc();
    }
}

#[inline]
pub fn encode_rejected(err: &SszError) {
    if let Some(c) = ENCODE_REJECTED.as_ref() {
        c.with_label_values(&[err.kind()]).inc();
    }
}

#[inline]
pub fn root_computed() {
    if let Some(c) = ROOTS_TOTAL.as_ref() {
        c.inc();
    }
}
