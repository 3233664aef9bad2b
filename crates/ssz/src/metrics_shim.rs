// No-op counterparts of `metrics.rs` when the `metrics` feature is off.

use crate::error::SszError;

#[inline]
pub fn decode_rejected(_err: &SszError) {}

#[inline]
pub fn encode_rejected(_err: &SszError) {}

#[inline]
pub fn root_computed() {}
