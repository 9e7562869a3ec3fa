use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

const SUPPRESSED_SUBSTRINGS: &[&str] = &["TLS handshake error", "no certificate available"];

/// Drops the bot-noise hickory/rustls error-log lines spec.md §4.5 calls
/// out ("TLS error suppression"), routing everything else through
/// unchanged. Implemented as `event_enabled` rather than `on_event` so the
/// event never reaches downstream layers at all, instead of merely being
/// hidden from one formatter.
pub struct TlsNoiseFilter;

impl<S: Subscriber> Layer<S> for TlsNoiseFilter {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        !SUPPRESSED_SUBSTRINGS
            .iter()
            .any(|needle| visitor.message.contains(needle))
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        }
    }
}
