//! Structured diagnostics (§4.9, ambient).
//!
//! The interpreter never prints. Every warning and debug trace goes through
//! `tracing`; the embedding application installs its own subscriber. The
//! `WarnSink` trait additionally lets a host capture structured warning
//! records (location + message) rather than only formatted text.

use crate::span::Location;

pub trait WarnSink {
    fn warn(&self, location: Option<&Location>, message: &str);
}

/// Default sink: forwards everything to `tracing::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnSink;

impl WarnSink for TracingWarnSink {
    fn warn(&self, location: Option<&Location>, message: &str) {
        match location {
            Some(loc) if !loc.is_unknown() => {
                tracing::warn!(file = %loc.file, line = loc.line, column = loc.column, "{message}");
            }
            _ => tracing::warn!("{message}"),
        }
    }
}
