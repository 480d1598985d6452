//! `tracing` layer that feeds the host application's diagnostics into the
//! logger.

use std::fmt::{self, Write as _};

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context};

use crate::log::host_feed::{HostFeed, HostLevel};

/// Events from this crate are never fed back into its own queue.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");
const OWN_MODULE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

const MESSAGE_FIELD: &str = "message";
const STACK_TRACE_FIELDS: [&str; 3] = ["stack_trace", "backtrace", "panic.backtrace"];
const PANIC_FIELD_PREFIX: &str = "panic.";

/// Forwards every `tracing` event to a [`HostFeed`].
///
/// Levels map through [`HostLevel`]; an event carrying any `panic.*` field
/// (as emitted by panic hooks) is treated as [`HostLevel::Panic`].
///
/// ```ignore
/// use tracing_subscriber::prelude::*;
///
/// tracing_subscriber::registry().with(logger.host_layer()).init();
/// tracing::warn!("cache miss storm");
/// ```
#[derive(Clone, Debug)]
pub struct HostFeedLayer {
    feed: HostFeed,
}

impl HostFeedLayer {
    #[must_use]
    pub fn new(feed: HostFeed) -> Self {
        Self { feed }
    }
}

/// Collects the message, an optional stack trace and the remaining fields.
#[derive(Default)]
struct HostEventVisitor {
    message: String,
    stack_trace: Option<String>,
    panic: bool,
    fields: String,
}

impl HostEventVisitor {
    fn put(&mut self, field: &Field, value: String) {
        let name = field.name();
        if name == MESSAGE_FIELD {
            self.message = value;
            return;
        }
        if name.starts_with(PANIC_FIELD_PREFIX) {
            self.panic = true;
        }
        if STACK_TRACE_FIELDS.contains(&name) {
            self.stack_trace = Some(value);
        } else {
            let _ = write!(self.fields, " {name}={value}");
        }
    }

    fn into_message(self) -> (String, Option<String>, bool) {
        let mut message = self.message;
        message.push_str(&self.fields);
        (message, self.stack_trace, self.panic)
    }
}

impl Visit for HostEventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }
}

/// This crate itself or one of its modules; sibling crates sharing the
/// name as a prefix are host code.
fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET || target.starts_with(OWN_MODULE_PREFIX)
}

impl<S> Layer<S> for HostFeedLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if is_own_target(meta.target()) || !self.feed.is_registered() {
            return;
        }

        let mut visitor = HostEventVisitor::default();
        event.record(&mut visitor);
        let (message, stack_trace, panic) = visitor.into_message();

        let level = if panic {
            HostLevel::Panic
        } else {
            HostLevel::from(*meta.level())
        };
        self.feed.dispatch(level, &message, stack_trace.as_deref());
    }
}
