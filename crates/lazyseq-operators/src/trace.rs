//! Tracing hooks for buffering operators (feature: `tracing`).

#[cfg(feature = "tracing")]
pub(crate) fn trace_buffered(op: &'static str, elements: usize) {
    tracing::trace!(op, elements, "buffered upstream");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_buffered(_op: &'static str, _elements: usize) { /* no-op */
}
