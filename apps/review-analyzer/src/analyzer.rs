use hf_inference::{ClassifyError, HttpTransport, SentimentClient};
use rand::{SeedableRng, rngs::StdRng};
use review_corpus::{DatasetLoader, LoadError, ReviewCorpus, pick_random};
use shared_states::{ClassificationResult, MessageKind, Report, ReportEvent, Status};
use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info, warn};

/// Outcome of one analysis trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// Another analysis is still running, nothing was done.
    Busy,
    /// The corpus is empty, nothing was done.
    NoReviews,
    Completed {
        review: String,
        result: ClassificationResult,
    },
    Failed {
        review: String,
        error: ClassifyError,
    },
}

struct AppState {
    corpus: ReviewCorpus,
    token: Option<String>,
    load_status: Status,
    analysis_status: Status,
    rng: StdRng,
}

/// Clears the busy flag when dropped, whatever path the analysis took.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Analyzer owns the application state and runs the load and analysis flows.
pub struct Analyzer<T, V> {
    client: SentimentClient<T>,
    loader: DatasetLoader,
    view: V,
    state: Mutex<AppState>,
    busy: AtomicBool,
}

impl<T, V> Analyzer<T, V>
where
    T: HttpTransport,
    V: Report,
{
    /// Creates a new analyzer with an empty corpus.
    ///
    /// # Arguments
    /// * `client` - classification client.
    /// * `loader` - dataset loader used by [`Analyzer::load`].
    /// * `view` - sink receiving every status change.
    pub fn new(client: SentimentClient<T>, loader: DatasetLoader, view: V) -> Self {
        Self {
            client,
            loader,
            view,
            state: Mutex::new(AppState {
                corpus: ReviewCorpus::default(),
                token: None,
                load_status: Status::default(),
                analysis_status: Status::default(),
                rng: StdRng::from_os_rng(),
            }),
            busy: AtomicBool::new(false),
        }
    }

    /// Replaces the randomness source used to pick reviews.
    pub fn with_rng(self, rng: StdRng) -> Self {
        self.lock_state().rng = rng;
        self
    }

    pub fn with_token(self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Sets the bearer token for the following analyses, blank clears it.
    pub fn set_token(&self, token: Option<String>) {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self.lock_state().token = token;
    }

    pub fn has_token(&self) -> bool {
        self.lock_state().token.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn review_count(&self) -> usize {
        self.lock_state().corpus.len()
    }

    /// Whether a trigger would start an analysis right now.
    pub fn can_analyze(&self) -> bool {
        !self.is_busy() && self.review_count() > 0
    }

    pub fn load_status(&self) -> Status {
        self.lock_state().load_status.clone()
    }

    pub fn analysis_status(&self) -> Status {
        self.lock_state().analysis_status.clone()
    }

    /// Loads the dataset and replaces the corpus wholesale.
    ///
    /// # Returns
    /// * Number of usable reviews, or the load error already reported to the view.
    pub async fn load(&self) -> Result<usize, LoadError> {
        self.set_load_status(Status::pending("Loading TSV…"));
        self.view
            .report(ReportEvent::top_message("", MessageKind::Muted));

        let outcome = self.loader.load().await;
        let (corpus, status, top) = match &outcome {
            Ok(corpus) => {
                info!(reviews = corpus.len(), "Dataset loaded");
                (
                    corpus.clone(),
                    Status::ok(format!("TSV loaded ({} reviews)", corpus.len())),
                    ReportEvent::top_message("TSV loaded. Ready to analyze.", MessageKind::Ok),
                )
            }
            Err(e) if e.is_soft() => {
                warn!("Dataset has no usable reviews: {e}");
                (
                    ReviewCorpus::default(),
                    Status::error("No valid reviews found"),
                    ReportEvent::top_message(e.to_string(), MessageKind::Error),
                )
            }
            Err(e) => {
                warn!("Failed to load dataset: {e}");
                (
                    ReviewCorpus::default(),
                    Status::error("Failed to load TSV"),
                    ReportEvent::top_message(e.to_string(), MessageKind::Error),
                )
            }
        };

        let count = corpus.len();
        self.lock_state().corpus = corpus;
        self.view.report(ReportEvent::ReviewCount(count));
        self.set_load_status(status);
        self.view.report(top);

        outcome.map(|_| count)
    }

    /// Picks a random review and classifies it.
    ///
    /// A trigger arriving while another analysis runs is a no-op.
    pub async fn analyze(&self) -> AnalyzeOutcome {
        let Some(busy) = BusyGuard::try_acquire(&self.busy) else {
            debug!("Analysis already in flight, ignoring trigger");
            return AnalyzeOutcome::Busy;
        };

        let (review, token) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            let review = pick_random(state.corpus.as_slice(), &mut state.rng).map(str::to_owned);
            (review, state.token.clone())
        };
        let Some(review) = review else {
            debug!("No reviews loaded, ignoring trigger");
            return AnalyzeOutcome::NoReviews;
        };

        self.view.report(ReportEvent::Review(review.clone()));
        self.view.report(ReportEvent::ResultCleared);
        self.view
            .report(ReportEvent::api_message("", MessageKind::Muted));
        self.view.report(ReportEvent::Busy(true));
        self.lock_state().analysis_status = Status::pending("Analyzing…");

        let outcome = match self.client.classify(&review, token.as_deref()).await {
            Ok(result) => {
                self.view.report(ReportEvent::Result(result));
                self.view
                    .report(ReportEvent::api_message("Analysis complete.", MessageKind::Ok));
                self.lock_state().analysis_status = Status::ok("Analysis complete.");
                AnalyzeOutcome::Completed { review, result }
            }
            Err(error) => {
                warn!("Analysis failed: {error}");
                self.view
                    .report(ReportEvent::Result(ClassificationResult::neutral()));
                self.view
                    .report(ReportEvent::api_message(error.to_string(), MessageKind::Error));
                self.lock_state().analysis_status = Status::error(error.to_string());
                AnalyzeOutcome::Failed { review, error }
            }
        };

        drop(busy);
        self.view.report(ReportEvent::Busy(false));
        outcome
    }

    fn set_load_status(&self, status: Status) {
        self.lock_state().load_status = status.clone();
        self.view.report(ReportEvent::DataStatus(status));
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
