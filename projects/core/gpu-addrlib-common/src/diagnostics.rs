//! Diagnostic reporting for the address library.
//!
//! The library never prints on its own. Every instance owns a
//! [`DiagnosticSink`] chosen at construction time and reports unusual but
//! non-fatal conditions through it. The default sink forwards to [`tracing`].

use core::fmt;

/// Receiver of diagnostic messages emitted by a library instance.
///
/// Implementations must be thread safe, as a constructed library may be
/// queried from several threads at once.
pub trait DiagnosticSink: Send + Sync {
    /// Reports a condition the caller probably wants to know about.
    fn warn(&self, args: fmt::Arguments<'_>);

    /// Reports progress or internal detail.
    fn info(&self, args: fmt::Arguments<'_>);
}

/// Forwards diagnostics to the [`tracing`] facade.
///
/// Warnings are emitted at `WARN` level, informational messages at `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(target: "gpu_addrlib", "{}", args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "gpu_addrlib", "{}", args);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn warn(&self, _args: fmt::Arguments<'_>) {}

    fn info(&self, _args: fmt::Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, string::ToString, vec::Vec};
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        warnings: Mutex<Vec<String>>,
        infos: AtomicUsize,
    }

    impl DiagnosticSink for Recording {
        fn warn(&self, args: fmt::Arguments<'_>) {
            self.warnings.lock().unwrap().push(args.to_string());
        }

        fn info(&self, _args: fmt::Arguments<'_>) {
            self.infos.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn sinks_are_object_safe() {
        let recording = Recording::default();
        let sinks: [&dyn DiagnosticSink; 3] = [&TracingSink, &NullSink, &recording];
        for sink in sinks {
            sink.warn(format_args!("slice {} lost bits", 3));
            sink.info(format_args!("built {} equations", 8));
        }

        let warnings = recording.warnings.lock().unwrap();
        assert_eq!(warnings.as_slice(), ["slice 3 lost bits"]);
        assert_eq!(recording.infos.load(Ordering::Relaxed), 1);
    }
}
