//! Minimal `.env` file loader.
//!
//! Each line of the file is handled on its own:
//!
//! - a line starting with `#` is a comment and skipped;
//! - otherwise it is split on the first `=` into key and value, and the pair
//!   is written to the store exactly as it appears (no trimming, no quote
//!   stripping, no escapes, no `${VAR}` expansion);
//! - a line without `=` (including an empty line) is logged as a warning and
//!   skipped, as is a line that is not valid UTF-8.
//!
//! Later lines overwrite earlier ones, so the last assignment of a key wins.
//!
//! Loading is best-effort. A missing or unreadable file is logged and the
//! loader returns normally; nothing here returns an error.
//!
//! ```rust,ignore
//! envtype::load_default();
//! let url = envtype::declare("DATABASE_URL").as_string().required().resolve()?;
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::store::{EnvStore, ProcessEnv};

/// File loaded by [`load_default`].
pub const DEFAULT_PATH: &str = ".env";

/// Counts of what a load did with each line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadSummary {
    /// Assignments written to the store.
    pub applied: usize,

    /// Comment lines skipped.
    pub comments: usize,

    /// Lines without `=` or with invalid UTF-8, skipped with a warning.
    pub malformed: usize,

    /// Assignments the store refused (empty key, NUL byte).
    pub rejected: usize,
}

impl LoadSummary {
    /// Total lines read.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.applied + self.comments + self.malformed + self.rejected
    }
}

/// Loads `.env` from the current directory into the process environment.
///
/// See [`load_file`] for the thread-safety caveat.
pub fn load_default() -> LoadSummary {
    load_file(DEFAULT_PATH)
}

/// Loads `.env` from the current directory into `store`.
pub fn load_default_into<S: EnvStore + ?Sized>(store: &S) -> LoadSummary {
    load_file_into(store, DEFAULT_PATH)
}

/// Loads `path` into the process environment.
///
/// This calls `std::env::set_var`; do not run it while other threads may
/// read the environment.
pub fn load_file(path: impl AsRef<Path>) -> LoadSummary {
    load_file_into(&ProcessEnv, path)
}

/// Loads `path` into `store`.
pub fn load_file_into<S: EnvStore + ?Sized>(store: &S, path: impl AsRef<Path>) -> LoadSummary {
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "failed to open dotenv file");
            return LoadSummary::default();
        }
    };

    let origin = path.display().to_string();
    let summary = apply_lines(store, BufReader::new(file), &origin);

    tracing::debug!(
        path = %origin,
        applied = summary.applied,
        malformed = summary.malformed,
        "loaded dotenv file"
    );

    summary
}

/// Loads dotenv-formatted lines from any reader into `store`.
pub fn load_reader_into<S: EnvStore + ?Sized, R: BufRead>(store: &S, reader: R) -> LoadSummary {
    apply_lines(store, reader, "<reader>")
}

fn apply_lines<S: EnvStore + ?Sized, R: BufRead>(
    store: &S,
    mut reader: R,
    origin: &str,
) -> LoadSummary {
    let mut summary = LoadSummary::default();
    let mut buf = Vec::new();
    let mut line_no: usize = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line_no += 1,
            Err(error) => {
                // Lines already applied stay applied.
                tracing::error!(path = origin, line = line_no + 1, %error, "failed to read dotenv file");
                break;
            }
        }

        if buf.ends_with(b"\n") {
            buf.pop();
        }
        if buf.ends_with(b"\r") {
            buf.pop();
        }

        if buf.first() == Some(&b'#') {
            summary.comments += 1;
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!(path = origin, line = line_no, %error, "invalid utf-8 in env line");
                summary.malformed += 1;
                continue;
            }
        };

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(path = origin, line = line_no, value = %line, "invalid env value");
            summary.malformed += 1;
            continue;
        };

        match store.set(key, value) {
            Ok(()) => summary.applied += 1,
            Err(error) => {
                tracing::warn!(path = origin, line = line_no, %error, "failed to set env value");
                summary.rejected += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use parking_lot::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::subscriber::Interest;
    use tracing::{Dispatch, Event, Level, Metadata, Subscriber, span};

    use super::*;
    use crate::MemoryEnv;

    fn load(content: &str) -> (MemoryEnv, LoadSummary) {
        let store = MemoryEnv::new();
        let summary = load_reader_into(&store, content.as_bytes());
        (store, summary)
    }

    #[test]
    fn test_basic_assignments() {
        let (store, summary) = load("HOST=localhost\nPORT=8080\n");
        assert_eq!(store.get("HOST"), "localhost");
        assert_eq!(store.get("PORT"), "8080");
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.lines(), 2);
    }

    #[test]
    fn test_comments_skipped() {
        let (store, summary) = load("# PORT=1\nPORT=2\n");
        assert_eq!(store.get("PORT"), "2");
        assert_eq!(summary.comments, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_indented_hash_is_not_a_comment() {
        let (store, summary) = load(" # NOTE=x\n");
        assert_eq!(store.get(" # NOTE"), "x");
        assert_eq!(summary.comments, 0);
        assert_eq!(summary.applied, 1);
    }

    #[test]
    fn test_split_on_first_equals() {
        let (store, _) = load("DATABASE_URL=postgres://u:p@h/db?sslmode=require\n");
        assert_eq!(store.get("DATABASE_URL"), "postgres://u:p@h/db?sslmode=require");

        let (store, _) = load("EQ==\n");
        assert_eq!(store.get("EQ"), "=");
    }

    #[test]
    fn test_raw_values_not_trimmed_or_unquoted() {
        let (store, _) = load("KEY = spaced \nQUOTED=\"hello world\"\nREF=${HOME}\n");
        assert_eq!(store.get("KEY "), " spaced ");
        assert!(!store.contains("KEY"));
        assert_eq!(store.get("QUOTED"), "\"hello world\"");
        assert_eq!(store.get("REF"), "${HOME}");
    }

    #[test]
    fn test_malformed_and_empty_lines() {
        let (store, summary) = load("GOOD=1\n\nNOT_AN_ASSIGNMENT\nALSO_GOOD=2\n");
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.malformed, 2);
        assert_eq!(store.len(), 2);
        assert!(!store.contains("NOT_AN_ASSIGNMENT"));
    }

    #[test]
    fn test_empty_value_is_set() {
        let (store, summary) = load("EMPTY=\n");
        assert!(store.contains("EMPTY"));
        assert_eq!(store.get("EMPTY"), "");
        assert_eq!(summary.applied, 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let (store, summary) = load("=value\n");
        assert!(store.is_empty());
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let (store, summary) = load("A=1\nA=2\nA=3\n");
        assert_eq!(store.get("A"), "3");
        assert_eq!(summary.applied, 3);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (store, _) = load("A=1\r\nB=2\r\n");
        assert_eq!(store.get("A"), "1");
        assert_eq!(store.get("B"), "2");
    }

    #[test]
    fn test_no_trailing_newline() {
        let (store, _) = load("A=1");
        assert_eq!(store.get("A"), "1");
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let store = MemoryEnv::new();
        let content: &[u8] = b"A=1\nB=\xff\nC=3\n";
        let summary = load_reader_into(&store, content);
        assert_eq!(store.get("A"), "1");
        assert!(!store.contains("B"));
        assert_eq!(store.get("C"), "3");
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.malformed, 1);
    }

    #[test]
    fn test_latin1_comment_does_not_stop_loading() {
        let store = MemoryEnv::new();
        let content: &[u8] = b"A=1\n# caf\xe9 settings\r\nB=2\nC=3\n";
        let summary = load_reader_into(&store, content);
        assert_eq!(store.get("A"), "1");
        assert_eq!(store.get("B"), "2");
        assert_eq!(store.get("C"), "3");
        assert_eq!(summary.comments, 1);
        assert_eq!(summary.lines(), 4);
    }

    #[test]
    fn test_carriage_return_stripped_at_end_of_file() {
        let (store, _) = load("A=1\r");
        assert_eq!(store.get("A"), "1");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let store = MemoryEnv::new();
        let summary = load_file_into(&store, "/nonexistent/envtype/.env");
        assert_eq!(summary, LoadSummary::default());
        assert!(store.is_empty());
    }

    // ------------------------------------------------------------------------
    // Log capture
    // ------------------------------------------------------------------------

    /// Records the level and message of every event.
    #[derive(Clone, Default)]
    struct CapturingSubscriber {
        events: Arc<Mutex<Vec<(Level, String)>>>,
        next_id: Arc<AtomicU64>,
    }

    #[derive(Default)]
    struct MessageVisitor {
        message: Option<String>,
    }

    impl Visit for MessageVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                self.message = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.message = Some(format!("{value:?}"));
            }
        }
    }

    impl Subscriber for CapturingSubscriber {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _attrs: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
        }

        fn record(&self, _span: &span::Id, _values: &span::Record<'_>) {}

        fn record_follows_from(&self, _span: &span::Id, _follows: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            if let Some(message) = visitor.message {
                self.events
                    .lock()
                    .push((*event.metadata().level(), message));
            }
        }

        fn enter(&self, _span: &span::Id) {}

        fn exit(&self, _span: &span::Id) {}

        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::always()
        }
    }

    fn capture_events<F: FnOnce()>(f: F) -> Vec<(Level, String)> {
        let subscriber = CapturingSubscriber::default();
        let dispatch = Dispatch::new(subscriber.clone());
        tracing::dispatcher::with_default(&dispatch, f);
        std::mem::take(&mut *subscriber.events.lock())
    }

    #[test]
    fn test_malformed_line_logs_warning() {
        let events = capture_events(|| {
            let (store, _) = load("GOOD=1\nNOT_AN_ASSIGNMENT\n");
            assert_eq!(store.len(), 1);
        });

        let warnings: Vec<_> = events
            .iter()
            .filter(|(level, _)| *level == Level::WARN)
            .collect();
        assert_eq!(warnings.len(), 1, "{events:?}");
        assert_eq!(warnings[0].1, "invalid env value");
    }

    #[test]
    fn test_invalid_utf8_logs_warning() {
        let events = capture_events(|| {
            let store = MemoryEnv::new();
            load_reader_into(&store, &b"A=\xff\n"[..]);
        });

        assert!(
            events.contains(&(Level::WARN, "invalid utf-8 in env line".to_string())),
            "{events:?}"
        );
    }

    #[test]
    fn test_open_failure_logs_error() {
        let events = capture_events(|| {
            load_file_into(&MemoryEnv::new(), "/nonexistent/envtype/.env");
        });

        assert!(
            events.contains(&(Level::ERROR, "failed to open dotenv file".to_string())),
            "{events:?}"
        );
    }

    #[test]
    fn test_well_formed_file_logs_no_warnings() {
        let events = capture_events(|| {
            load("# comment\nA=1\n");
        });

        assert!(
            events.iter().all(|(level, _)| *level > Level::WARN),
            "{events:?}"
        );
    }
}
