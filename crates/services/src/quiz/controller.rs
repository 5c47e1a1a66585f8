use std::fmt;
use std::sync::Arc;

use catalog::ContentCatalog;
use stem_core::Clock;
use stem_core::model::{Evaluation, GameQuestion, GameSummary, Grade, ScoringRules, Subject};
use tokio::sync::{oneshot, watch};

use super::answers::{AnswerState, MatchSide};
use super::engine::{QuizEngine, Step};
use crate::error::LoadError;

/// Everything the game screen renders, republished after every intent.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub subject: Subject,
    pub grade: Grade,
    pub is_loading: bool,
    pub question_index: usize,
    pub total_questions: usize,
    pub current_question: Option<GameQuestion>,
    pub score: u32,
    pub answers: AnswerState,
    pub show_result: bool,
    pub is_answer_correct: Option<bool>,
    pub error_message: Option<String>,
}

/// Drives game mode for one subject and grade.
///
/// The end of the game is delivered once through [`GameController::finished`],
/// never through the snapshot, so re-reading state cannot replay it.
pub struct GameController {
    catalog: Arc<dyn ContentCatalog>,
    clock: Clock,
    rules: ScoringRules,
    subject: Subject,
    grade: Grade,
    engine: Option<QuizEngine>,
    state: watch::Sender<GameSnapshot>,
    finished_tx: Option<oneshot::Sender<GameSummary>>,
    finished_rx: Option<oneshot::Receiver<GameSummary>>,
}

impl GameController {
    /// Create a controller in the loading state. Call [`GameController::load`] next.
    #[must_use]
    pub fn new(catalog: Arc<dyn ContentCatalog>, subject: Subject, grade: Grade) -> Self {
        let (state, _) = watch::channel(loading_snapshot(subject, grade));
        let (finished_tx, finished_rx) = oneshot::channel();
        Self {
            catalog,
            clock: Clock::default(),
            rules: ScoringRules::default(),
            subject,
            grade,
            engine: None,
            state,
            finished_tx: Some(finished_tx),
            finished_rx: Some(finished_rx),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    /// Load the questions from the catalog. Returns the number of questions loaded.
    ///
    /// A failed load is logged, surfaced as the error message and leaves the
    /// controller loaded with no questions.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Catalog` if the catalog failed.
    pub async fn load(&mut self) -> Result<usize, LoadError> {
        self.engine = None;
        self.publish();

        let loaded = self.catalog.load_questions(self.subject, self.grade).await;
        let (questions, result) = match loaded {
            Ok(questions) => {
                let count = questions.len();
                (questions, Ok(count))
            }
            Err(err) => {
                tracing::error!(subject = %self.subject, grade = %self.grade, error = %err, "failed to load questions");
                (Vec::new(), Err(err))
            }
        };

        let mut engine = QuizEngine::new(self.subject, self.grade, questions)
            .with_rules(self.rules)
            .with_clock(self.clock);
        if let Err(err) = &result {
            engine.report_error(format!("Failed to load questions: {err}"));
        }
        self.engine = Some(engine);
        self.publish();
        result.map_err(LoadError::from)
    }

    /// Subscribe to snapshots; the receiver starts with the current state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver for the end-of-game summary. Handed out once; later calls return `None`.
    pub fn finished(&mut self) -> Option<oneshot::Receiver<GameSummary>> {
        self.finished_rx.take()
    }

    #[must_use]
    pub fn engine(&self) -> Option<&QuizEngine> {
        self.engine.as_ref()
    }

    //
    // ─── INTENTS ───────────────────────────────────────────────────────────────
    //

    pub fn select_answer(&mut self, option: &str) -> Option<Evaluation> {
        self.apply(|engine| engine.select_answer(option)).flatten()
    }

    pub fn select_label(&mut self, label: &str) {
        self.apply(|engine| engine.select_label(label));
    }

    pub fn place_label_on_part(&mut self, part: &str) {
        self.apply(|engine| engine.place_label_on_part(part));
    }

    pub fn submit_labeling(&mut self) -> Option<Evaluation> {
        self.apply(QuizEngine::submit_labeling).flatten()
    }

    pub fn on_matching_item_clicked(&mut self, item: &str, side: MatchSide) {
        self.apply(|engine| engine.on_matching_item_clicked(item, side));
    }

    pub fn submit_matching(&mut self) -> Option<Evaluation> {
        self.apply(QuizEngine::submit_matching).flatten()
    }

    /// Move to the next question; on the last one, deliver the summary to
    /// the [`GameController::finished`] receiver.
    pub fn next_question(&mut self) -> Option<Step> {
        let step = self.apply(QuizEngine::advance)?;
        let summary = self.engine.as_mut().and_then(QuizEngine::take_finished);
        if let Some(summary) = summary {
            if let Some(tx) = self.finished_tx.take() {
                if tx.send(summary).is_err() {
                    tracing::debug!("finished receiver dropped before game end");
                }
            }
        }
        Some(step)
    }

    pub fn clear_error(&mut self) {
        self.apply(QuizEngine::clear_error);
    }

    fn apply<T>(&mut self, intent: impl FnOnce(&mut QuizEngine) -> T) -> Option<T> {
        let Some(engine) = self.engine.as_mut() else {
            tracing::debug!("intent ignored while loading");
            return None;
        };
        let out = intent(engine);
        self.publish();
        Some(out)
    }

    fn publish(&self) {
        let snapshot = match &self.engine {
            Some(engine) => engine_snapshot(engine),
            None => loading_snapshot(self.subject, self.grade),
        };
        self.state.send_replace(snapshot);
    }
}

fn loading_snapshot(subject: Subject, grade: Grade) -> GameSnapshot {
    GameSnapshot {
        subject,
        grade,
        is_loading: true,
        question_index: 0,
        total_questions: 0,
        current_question: None,
        score: 0,
        answers: AnswerState::default(),
        show_result: false,
        is_answer_correct: None,
        error_message: None,
    }
}

fn engine_snapshot(engine: &QuizEngine) -> GameSnapshot {
    GameSnapshot {
        subject: engine.subject(),
        grade: engine.grade(),
        is_loading: false,
        question_index: engine.question_index(),
        total_questions: engine.question_count(),
        current_question: engine.current_question().cloned(),
        score: engine.score(),
        answers: engine.answers().clone(),
        show_result: engine.show_result(),
        is_answer_correct: engine.is_answer_correct(),
        error_message: engine.error_message().map(str::to_string),
    }
}

impl fmt::Debug for GameController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameController")
            .field("subject", &self.subject)
            .field("grade", &self.grade)
            .field("engine", &self.engine)
            .field("finished_taken", &self.finished_rx.is_none())
            .finish_non_exhaustive()
    }
}
