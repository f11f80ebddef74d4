//! Metrics/tracing hooks.
//!
//! This module purposefully avoids pulling heavy telemetry stacks.
//! Wire these up to a subscriber in the binary layer.

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::TRACE, "lazyseq", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}
