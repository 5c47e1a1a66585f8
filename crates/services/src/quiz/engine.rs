use chrono::{DateTime, Utc};
use std::fmt;

use stem_core::Clock;
use stem_core::model::{
    Evaluation, GameKind, GameQuestion, GameSummary, Grade, QuestionResult, ScoringRules, Subject,
};

use super::answers::{AnswerState, MatchSide};

const NO_QUESTIONS: &str = "No questions available for this grade and subject.";

/// Outcome of [`QuizEngine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the question at `index`.
    Next { index: usize },
    /// Already on the last question; the session is over.
    Finished,
}

/// Game-mode state machine: walks the questions in order, evaluates answers and
/// keeps the score.
///
/// Intents that do not apply to the current state (answer already shown, blank
/// input, wrong question kind) are no-ops and return `None` or `false`.
pub struct QuizEngine {
    subject: Subject,
    grade: Grade,
    rules: ScoringRules,
    clock: Clock,
    questions: Vec<GameQuestion>,
    index: usize,
    score: u32,
    answers: AnswerState,
    show_result: bool,
    is_answer_correct: Option<bool>,
    error_message: Option<String>,
    results: Vec<QuestionResult>,
    started_at: DateTime<Utc>,
    finished: bool,
    pending_summary: Option<GameSummary>,
}

impl QuizEngine {
    #[must_use]
    pub fn new(subject: Subject, grade: Grade, questions: Vec<GameQuestion>) -> Self {
        let clock = Clock::default();
        let error_message = if questions.is_empty() {
            tracing::warn!(%subject, %grade, "no questions available");
            Some(NO_QUESTIONS.to_string())
        } else {
            None
        };
        Self {
            subject,
            grade,
            rules: ScoringRules::default(),
            started_at: clock.now(),
            clock,
            questions,
            index: 0,
            score: 0,
            answers: AnswerState::default(),
            show_result: false,
            is_answer_correct: None,
            error_message,
            results: Vec::new(),
            finished: false,
            pending_summary: None,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    /// Use `clock` for session timestamps; restarts the session clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.started_at = clock.now();
        self
    }

    //
    // ─── STATE ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }

    #[must_use]
    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    #[must_use]
    pub fn questions(&self) -> &[GameQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question on screen; absent when nothing was loaded.
    #[must_use]
    pub fn current_question(&self) -> Option<&GameQuestion> {
        self.questions.get(self.index)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    #[must_use]
    pub fn show_result(&self) -> bool {
        self.show_result
    }

    #[must_use]
    pub fn is_answer_correct(&self) -> Option<bool> {
        self.is_answer_correct
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub(crate) fn report_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    //
    // ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────
    //

    /// Answer the current multiple-choice question. Scores at most once per question.
    pub fn select_answer(&mut self, option: &str) -> Option<Evaluation> {
        if self.show_result || option.trim().is_empty() {
            return None;
        }
        let correct = {
            let question = self.current_question()?;
            let Some(mcq) = question.as_mcq() else {
                self.kind_mismatch(GameKind::Mcq);
                return None;
            };
            mcq.is_correct(option)
        };
        self.answers.choose_option(option);
        let evaluation = self.rules.mcq(correct);
        Some(self.record(evaluation))
    }

    //
    // ─── LABELING ──────────────────────────────────────────────────────────────
    //

    /// Pick up a label; picking the same label again puts it down.
    pub fn select_label(&mut self, label: &str) {
        if label.trim().is_empty() {
            return;
        }
        self.answers.toggle_label(label);
    }

    /// Drop the selected label on a part of the current labeling question.
    ///
    /// The part name is matched loosely and stored as spelled in the question.
    /// Returns `false` when no label is selected or the part is unknown.
    pub fn place_label_on_part(&mut self, part: &str) -> bool {
        if part.trim().is_empty() {
            return false;
        }
        let name = {
            let Some(question) = self.current_question() else {
                return false;
            };
            let Some(data) = question.as_labeling() else {
                self.kind_mismatch(GameKind::Labeling);
                return false;
            };
            match data.part(part) {
                Some(found) => found.name.clone(),
                None => {
                    tracing::warn!(index = self.index, part, "label dropped on unknown part");
                    return false;
                }
            }
        };
        self.answers.place_selected_label(&name)
    }

    pub fn submit_labeling(&mut self) -> Option<Evaluation> {
        if self.show_result {
            return None;
        }
        let (correct_count, total) = {
            let question = self.current_question()?;
            let Some(data) = question.as_labeling() else {
                self.kind_mismatch(GameKind::Labeling);
                return None;
            };
            (
                data.correct_count(self.answers.labeled_parts()),
                data.parts.len(),
            )
        };
        let evaluation = self.rules.labeling(correct_count, total);
        Some(self.record(evaluation))
    }

    //
    // ─── MATCHING ──────────────────────────────────────────────────────────────
    //

    /// Tap an item of a matching question.
    ///
    /// A left item becomes (or stops being) the pending anchor; a right item is
    /// paired with the pending anchor. Returns `true` when a pair was made.
    pub fn on_matching_item_clicked(&mut self, item: &str, side: MatchSide) -> bool {
        if self.show_result || item.trim().is_empty() {
            return false;
        }
        match side {
            MatchSide::Left => {
                self.answers.toggle_left(item);
                false
            }
            MatchSide::Right => self.answers.match_right(item),
        }
    }

    pub fn submit_matching(&mut self) -> Option<Evaluation> {
        if self.show_result {
            return None;
        }
        let (correct_count, total) = {
            let question = self.current_question()?;
            let Some(data) = question.as_matching() else {
                self.kind_mismatch(GameKind::Matching);
                return None;
            };
            (
                data.correct_count(self.answers.matched_pairs()),
                data.correct_pairs.len(),
            )
        };
        let evaluation = self.rules.matching(correct_count, total);
        Some(self.record(evaluation))
    }

    //
    // ─── PROGRESSION ───────────────────────────────────────────────────────────
    //

    /// Prepare the next question, or finish the session when on the last one.
    ///
    /// The finished signal is raised the first time only; see [`QuizEngine::take_finished`].
    pub fn advance(&mut self) -> Step {
        if !self.is_last_question() {
            self.index += 1;
            self.answers = AnswerState::default();
            self.show_result = false;
            self.is_answer_correct = None;
            tracing::debug!(index = self.index, score = self.score, "next question");
            return Step::Next { index: self.index };
        }

        if !self.finished {
            self.finished = true;
            let summary = GameSummary::from_results(
                self.subject,
                self.grade,
                self.started_at,
                self.clock.now(),
                self.questions.len(),
                self.results.clone(),
            );
            tracing::debug!(score = summary.score(), correct = summary.correct(), "game finished");
            self.pending_summary = Some(summary);
        }
        Step::Finished
    }

    /// Consume the finished signal. Yields the summary exactly once per session.
    pub fn take_finished(&mut self) -> Option<GameSummary> {
        self.pending_summary.take()
    }

    fn record(&mut self, evaluation: Evaluation) -> Evaluation {
        let kind = self
            .current_question()
            .map_or(GameKind::Mcq, GameQuestion::kind);
        self.score = self.score.saturating_add(evaluation.awarded);
        self.is_answer_correct = Some(evaluation.correct);
        self.show_result = true;
        self.results.push(QuestionResult {
            index: self.index,
            kind,
            evaluation,
        });
        tracing::debug!(
            index = self.index,
            %kind,
            correct = evaluation.correct,
            awarded = evaluation.awarded,
            score = self.score,
            "answer evaluated"
        );
        evaluation
    }

    fn kind_mismatch(&mut self, expected: GameKind) {
        let actual = self.current_question().map(GameQuestion::kind);
        tracing::warn!(index = self.index, %expected, ?actual, "answer does not fit current question");
        self.error_message = Some(format!("The current question has no {expected} data."));
    }
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("subject", &self.subject)
            .field("grade", &self.grade)
            .field("questions_len", &self.questions.len())
            .field("index", &self.index)
            .field("score", &self.score)
            .field("show_result", &self.show_result)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use stem_core::model::{LabelingData, LabelingPart, MatchingData, QuestionBody};
    use stem_core::time::{fixed_clock, fixed_now};

    fn labeling_question() -> GameQuestion {
        GameQuestion::new(
            "Label the plant",
            QuestionBody::Labeling(LabelingData {
                parts: vec![
                    LabelingPart::new("Leaves", 0.3, 0.3),
                    LabelingPart::new("Stem", 0.45, 0.55),
                    LabelingPart::new("Roots", 0.45, 0.85),
                ],
                labels: vec!["Leaves".into(), "Stem".into(), "Roots".into()],
            }),
        )
    }

    fn matching_question() -> GameQuestion {
        GameQuestion::new(
            "Match each part with its job",
            QuestionBody::Matching(MatchingData {
                left_items: vec!["Roots".into(), "Leaves".into(), "Stem".into()],
                right_items: vec![
                    "Absorb water".into(),
                    "Make food".into(),
                    "Support plant".into(),
                ],
                correct_pairs: BTreeMap::from([
                    ("Roots".to_string(), "Absorb water".to_string()),
                    ("Leaves".to_string(), "Make food".to_string()),
                    ("Stem".to_string(), "Support plant".to_string()),
                ]),
            }),
        )
    }

    fn engine(questions: Vec<GameQuestion>) -> QuizEngine {
        QuizEngine::new(Subject::Plant, Grade::new(6), questions).with_clock(fixed_clock())
    }

    fn label(engine: &mut QuizEngine, label: &str, part: &str) {
        engine.select_label(label);
        assert!(engine.place_label_on_part(part));
    }

    fn pair(engine: &mut QuizEngine, left: &str, right: &str) {
        engine.on_matching_item_clicked(left, MatchSide::Left);
        assert!(engine.on_matching_item_clicked(right, MatchSide::Right));
    }

    #[test]
    fn mcq_scores_once() {
        let mut engine = engine(vec![GameQuestion::mcq(
            "Which part absorbs water?",
            ["Leaves", "Roots", "Stem"],
            "Roots",
        )]);

        let first = engine.select_answer("Roots").unwrap();
        assert!(first.correct);
        assert_eq!(engine.score(), 10);
        assert!(engine.show_result());

        assert!(engine.select_answer("Stem").is_none());
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.answers().selected_option(), Some("Roots"));
        assert_eq!(engine.is_answer_correct(), Some(true));
    }

    #[test]
    fn mcq_ignores_blank_and_compares_loosely() {
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["Oxygen", "Water"], "Oxygen")]);
        assert!(engine.select_answer("   ").is_none());
        assert!(!engine.show_result());

        let evaluation = engine.select_answer(" oxygen ").unwrap();
        assert!(evaluation.correct);
    }

    #[test]
    fn wrong_mcq_answer_shows_result_without_points() {
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["Lever", "Phone"], "Lever")]);
        let evaluation = engine.select_answer("Phone").unwrap();
        assert!(!evaluation.correct);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.is_answer_correct(), Some(false));
    }

    #[test]
    fn labeling_full_credit() {
        let mut engine = engine(vec![labeling_question()]);
        label(&mut engine, "Leaves", "Leaves");
        label(&mut engine, "Stem", "Stem");
        label(&mut engine, "Roots", "Roots");

        let evaluation = engine.submit_labeling().unwrap();
        assert!(evaluation.correct);
        assert_eq!(engine.score(), 15);
        assert_eq!(engine.is_answer_correct(), Some(true));
    }

    #[test]
    fn labeling_partial_and_zero_credit() {
        let mut partial = engine(vec![labeling_question()]);
        label(&mut partial, "Leaves", "Leaves");
        label(&mut partial, "Roots", "Stem");
        label(&mut partial, "Stem", "Roots");
        partial.submit_labeling().unwrap();
        assert_eq!(partial.score(), 3);
        assert_eq!(partial.is_answer_correct(), Some(false));

        let mut none = engine(vec![labeling_question()]);
        label(&mut none, "Roots", "Leaves");
        none.submit_labeling().unwrap();
        assert_eq!(none.score(), 0);
    }

    #[test]
    fn label_selection_ignores_blanks_and_toggles() {
        let mut engine = engine(vec![labeling_question()]);
        engine.select_label("  ");
        assert_eq!(engine.answers().selected_label(), None);

        engine.select_label("Stem");
        assert!(!engine.place_label_on_part(""));
        assert_eq!(engine.answers().selected_label(), Some("Stem"));
        assert!(engine.answers().labeled_parts().is_empty());

        engine.select_label("Stem");
        assert_eq!(engine.answers().selected_label(), None);
        assert!(!engine.place_label_on_part("Stem"));
    }

    #[test]
    fn part_names_match_loosely_and_unknown_parts_are_rejected() {
        let mut engine = engine(vec![labeling_question()]);
        label(&mut engine, "stem", " STEM ");
        assert_eq!(engine.answers().labeled_parts()["Stem"], "stem");

        engine.select_label("Roots");
        assert!(!engine.place_label_on_part("Flower"));
        assert!(!engine.answers().labeled_parts().contains_key("Flower"));

        label(&mut engine, "leaves", "leaves");
        label(&mut engine, "roots", "roots");
        assert!(engine.submit_labeling().unwrap().correct);
        assert_eq!(engine.score(), 15);
    }

    #[test]
    fn placing_label_on_other_kind_is_noop_with_message() {
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["A"], "A")]);
        engine.select_label("A");
        assert!(!engine.place_label_on_part("A"));
        assert!(engine.answers().labeled_parts().is_empty());
        assert_eq!(
            engine.error_message(),
            Some("The current question has no labeling data.")
        );
    }

    #[test]
    fn summary_carries_clock_times() {
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["A"], "A")]);
        assert_eq!(engine.started_at(), fixed_now());
        engine.advance();
        let summary = engine.take_finished().unwrap();
        assert_eq!(summary.started_at(), fixed_now());
        assert_eq!(summary.completed_at(), fixed_now());
    }

    #[test]
    fn matching_partial_and_full_credit() {
        let mut partial = engine(vec![matching_question()]);
        pair(&mut partial, "Roots", "Absorb water");
        pair(&mut partial, "Leaves", "Make food");
        pair(&mut partial, "Stem", "Make food");
        let evaluation = partial.submit_matching().unwrap();
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(partial.score(), 4);

        let mut two = engine(vec![matching_question()]);
        pair(&mut two, "Roots", "Absorb water");
        pair(&mut two, "Leaves", "Make food");
        two.submit_matching().unwrap();
        assert_eq!(two.score(), 8);
        assert_eq!(two.is_answer_correct(), Some(false));

        let mut full = engine(vec![matching_question()]);
        pair(&mut full, "Roots", "Absorb water");
        pair(&mut full, "Leaves", "Make food");
        pair(&mut full, "Stem", "Support plant");
        full.submit_matching().unwrap();
        assert_eq!(full.score(), 20);
    }

    #[test]
    fn matching_clicks_ignored_after_submit() {
        let mut engine = engine(vec![matching_question()]);
        engine.submit_matching().unwrap();
        engine.on_matching_item_clicked("Roots", MatchSide::Left);
        assert_eq!(engine.answers().selected_left_item(), None);
        assert!(engine.submit_matching().is_none());
    }

    #[test]
    fn submit_for_other_kind_is_noop_with_message() {
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["A", "B"], "A")]);
        assert!(engine.submit_matching().is_none());
        assert!(engine.submit_labeling().is_none());
        assert!(!engine.show_result());
        assert_eq!(engine.score(), 0);
        assert!(engine.error_message().is_some());

        engine.clear_error();
        assert!(engine.error_message().is_none());
    }

    #[test]
    fn advance_resets_answer_state() {
        let mut engine = engine(vec![matching_question(), labeling_question()]);
        pair(&mut engine, "Roots", "Absorb water");
        engine.on_matching_item_clicked("Stem", MatchSide::Left);
        engine.submit_matching().unwrap();

        assert_eq!(engine.advance(), Step::Next { index: 1 });
        assert_eq!(engine.answers(), &AnswerState::default());
        assert!(!engine.show_result());
        assert_eq!(engine.is_answer_correct(), None);
        assert_eq!(engine.score(), 4);
    }

    #[test]
    fn finishing_signals_once() {
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["A", "B"], "A")]);
        engine.select_answer("A");

        assert_eq!(engine.advance(), Step::Finished);
        assert_eq!(engine.advance(), Step::Finished);
        assert_eq!(engine.question_index(), 0);

        let summary = engine.take_finished().unwrap();
        assert_eq!(summary.score(), 10);
        assert_eq!(summary.correct(), 1);
        assert!(engine.take_finished().is_none());
    }

    #[test]
    fn empty_questions_report_message() {
        let engine = engine(Vec::new());
        assert!(engine.current_question().is_none());
        assert_eq!(engine.error_message(), Some(NO_QUESTIONS));
    }

    #[test]
    fn custom_rules_change_points() {
        let rules = ScoringRules {
            mcq_correct: 1,
            ..ScoringRules::default()
        };
        let mut engine = engine(vec![GameQuestion::mcq("Pick", ["A"], "A")]).with_rules(rules);
        engine.select_answer("A");
        assert_eq!(engine.score(), 1);
    }
}
