use dictionary::{DictionaryError, Lookup, Word};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupResult {
    /// Nothing to show: no lookup yet, or the last one failed unexpectedly.
    #[default]
    Idle,
    Found(Vec<Word>),
    NotFound,
}

/// Handle of one issued lookup. `word` is already trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub seq: u64,
    pub word: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found(usize),
    NotFound,
    Failed,
    /// A newer lookup was issued after this one; its outcome was dropped.
    Stale,
}

/// Owns the search text and everything the view derives from.
#[derive(Debug, Default)]
pub struct Controller {
    query: String,
    pending: bool,
    result: LookupResult,
    issued: u64,
    last_error: Option<String>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn result(&self) -> &LookupResult {
        &self.result
    }

    /// Message of the last unexpected failure, cleared by the next settled lookup.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the search text verbatim.
    pub fn on_text_change(&mut self, new_text: impl Into<String>) {
        self.query = new_text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Issue a lookup for the current query. Returns `None` when the query is
    /// blank. Every other call issues a fresh ticket, even while another one
    /// is still pending.
    pub fn on_submit_requested(&mut self) -> Option<LookupTicket> {
        if !self.can_submit() {
            return None;
        }
        self.pending = true;
        self.issued += 1;
        let word = self.query.trim().to_lowercase();
        tracing::debug!(seq = self.issued, %word, "lookup issued");
        Some(LookupTicket {
            seq: self.issued,
            word,
        })
    }

    /// Apply the outcome of the lookup issued as `seq`.
    pub fn resolve(&mut self, seq: u64, outcome: Result<Vec<Word>, DictionaryError>) -> Resolution {
        if seq < self.issued {
            tracing::debug!(seq, latest = self.issued, "discarding stale lookup");
            // the page no longer shows it, the cause still reaches the log
            if let Err(error) = &outcome {
                if !error.is_not_found() {
                    tracing::error!(seq, %error, "dictionary lookup failed");
                }
            }
            return Resolution::Stale;
        }
        self.pending = false;
        match outcome {
            Ok(words) => {
                let count = words.len();
                self.last_error = None;
                self.result = LookupResult::Found(words);
                Resolution::Found(count)
            }
            Err(error) => {
                self.result = LookupResult::Idle;
                if error.is_not_found() {
                    tracing::debug!(%error, "word not found");
                    self.last_error = None;
                    self.result = LookupResult::NotFound;
                    Resolution::NotFound
                } else {
                    tracing::error!(%error, "dictionary lookup failed");
                    self.last_error = Some(error.to_string());
                    Resolution::Failed
                }
            }
        }
    }

    /// Submit and wait for the outcome in one go. `None` for a blank query.
    pub async fn submit_with(&mut self, lookup: &dyn Lookup) -> Option<Resolution> {
        let ticket = self.on_submit_requested()?;
        let outcome = lookup.lookup(&ticket.word).await;
        Some(self.resolve(ticket.seq, outcome))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use dictionary::{NotFoundError, StatusCode};
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    fn entry(word: &str) -> Word {
        Word {
            word: word.to_owned(),
            phonetic: None,
            phonetics: Vec::new(),
            origin: None,
            meanings: Vec::new(),
        }
    }

    fn not_found() -> DictionaryError {
        DictionaryError::NotFound(NotFoundError {
            title: "No Definitions Found".to_owned(),
            message: "Sorry pal".to_owned(),
            resolution: None,
        })
    }

    fn server_error() -> DictionaryError {
        DictionaryError::Status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn lines_at(&self, level: &str) -> usize {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains(level))
                .count()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, logs)
    }

    #[test]
    fn blank_queries_cannot_be_submitted() {
        let mut controller = Controller::new();
        for text in ["", " ", "\t", "  \n "] {
            controller.on_text_change(text);
            assert!(!controller.can_submit(), "{text:?} should not be submittable");
            assert_eq!(controller.on_submit_requested(), None);
            assert!(!controller.is_pending());
        }
    }

    #[test]
    fn text_is_kept_verbatim_until_submit() {
        let mut controller = Controller::new();
        controller.on_text_change("  Hello ");
        assert_eq!(controller.query(), "  Hello ");
        let ticket = controller.on_submit_requested().unwrap();
        assert_eq!(ticket.word, "hello");
        assert_eq!(controller.query(), "  Hello ");
    }

    #[test]
    fn pending_spans_submit_to_resolution_for_every_outcome() {
        let outcomes: Vec<Result<Vec<Word>, DictionaryError>> =
            vec![Ok(vec![entry("cat")]), Err(not_found()), Err(server_error())];
        for outcome in outcomes {
            let mut controller = Controller::new();
            controller.on_text_change("cat");
            let ticket = controller.on_submit_requested().unwrap();
            assert!(controller.is_pending());
            controller.resolve(ticket.seq, outcome);
            assert!(!controller.is_pending());
        }
    }

    #[test]
    fn success_keeps_service_order() {
        let mut controller = Controller::new();
        controller.on_text_change("bass");
        let ticket = controller.on_submit_requested().unwrap();
        let resolution = controller.resolve(ticket.seq, Ok(vec![entry("bass"), entry("bass2")]));
        assert_eq!(resolution, Resolution::Found(2));
        match controller.result() {
            LookupResult::Found(words) => {
                let names: Vec<&str> = words.iter().map(|word| word.word.as_str()).collect();
                assert_eq!(names, ["bass", "bass2"]);
            }
            other => panic!("expected found, got {other:?}"),
        }
    }

    #[test]
    fn not_found_replaces_a_previous_result() {
        let mut controller = Controller::new();
        controller.on_text_change("cat");
        let ticket = controller.on_submit_requested().unwrap();
        controller.resolve(ticket.seq, Ok(vec![entry("cat")]));

        controller.on_text_change("zzzzxx");
        let ticket = controller.on_submit_requested().unwrap();
        // the old result stays visible while the new lookup is in flight
        assert!(matches!(controller.result(), LookupResult::Found(_)));
        let (resolution, logs) = with_captured_logs(|| controller.resolve(ticket.seq, Err(not_found())));
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(controller.result(), &LookupResult::NotFound);
        assert_eq!(logs.lines_at("ERROR"), 0);
    }

    #[test]
    fn unexpected_failure_blanks_results_and_logs_once() {
        let mut controller = Controller::new();
        controller.on_text_change("cat");
        let ticket = controller.on_submit_requested().unwrap();
        controller.resolve(ticket.seq, Ok(vec![entry("cat")]));

        let ticket = controller.on_submit_requested().unwrap();
        let (resolution, logs) = with_captured_logs(|| controller.resolve(ticket.seq, Err(server_error())));
        assert_eq!(resolution, Resolution::Failed);
        assert_eq!(controller.result(), &LookupResult::Idle);
        assert_eq!(logs.lines_at("ERROR"), 1);
        assert!(controller.last_error().unwrap().contains("500"));
    }

    #[test]
    fn success_clears_a_previous_not_found_and_error() {
        let mut controller = Controller::new();
        controller.on_text_change("cat");
        let ticket = controller.on_submit_requested().unwrap();
        controller.resolve(ticket.seq, Err(server_error()));
        let ticket = controller.on_submit_requested().unwrap();
        controller.resolve(ticket.seq, Err(not_found()));
        assert_eq!(controller.last_error(), None);

        let ticket = controller.on_submit_requested().unwrap();
        controller.resolve(ticket.seq, Ok(vec![entry("cat")]));
        assert!(matches!(controller.result(), LookupResult::Found(_)));
    }

    #[test]
    fn overlapping_submits_issue_separate_tickets() {
        let mut controller = Controller::new();
        controller.on_text_change("cat");
        let first = controller.on_submit_requested().unwrap();
        let second = controller.on_submit_requested().unwrap();
        assert_ne!(first.seq, second.seq);
        assert_eq!(first.word, second.word);
    }

    #[test]
    fn stale_resolution_never_overwrites_a_newer_one() {
        let mut controller = Controller::new();
        controller.on_text_change("cat");
        let first = controller.on_submit_requested().unwrap();
        controller.on_text_change("dog");
        let second = controller.on_submit_requested().unwrap();

        assert_eq!(controller.resolve(second.seq, Ok(vec![entry("dog")])), Resolution::Found(1));
        assert_eq!(controller.resolve(first.seq, Ok(vec![entry("cat")])), Resolution::Stale);
        assert_eq!(controller.result(), &LookupResult::Found(vec![entry("dog")]));
        assert!(!controller.is_pending());
    }

    #[test]
    fn stale_resolution_leaves_the_newer_lookup_pending() {
        let mut controller = Controller::new();
        controller.on_text_change("cat");
        let first = controller.on_submit_requested().unwrap();
        let second = controller.on_submit_requested().unwrap();

        let (resolution, logs) = with_captured_logs(|| controller.resolve(first.seq, Err(server_error())));
        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(logs.lines_at("ERROR"), 1);
        assert!(controller.is_pending());
        assert_eq!(controller.last_error(), None);
        controller.resolve(second.seq, Err(not_found()));
        assert!(!controller.is_pending());
    }

    #[test]
    fn stale_not_found_is_not_logged_as_an_error() {
        let mut controller = Controller::new();
        controller.on_text_change("zzzzxx");
        let first = controller.on_submit_requested().unwrap();
        let second = controller.on_submit_requested().unwrap();
        controller.resolve(second.seq, Ok(vec![entry("zzzzxx")]));

        let (resolution, logs) = with_captured_logs(|| controller.resolve(first.seq, Err(not_found())));
        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(logs.lines_at("ERROR"), 0);
        assert_eq!(controller.result(), &LookupResult::Found(vec![entry("zzzzxx")]));
    }
}
