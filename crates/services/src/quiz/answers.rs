use std::collections::BTreeMap;

/// Column of a matching question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    Left,
    Right,
}

/// In-progress answer for the current question. Discarded on advance.
///
/// `labeled_parts` is unique on both sides (a label sits on at most one part) and so
/// is `matched_pairs` (a right item is matched to at most one left item).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerState {
    selected_option: Option<String>,
    labeled_parts: BTreeMap<String, String>,
    selected_label: Option<String>,
    matched_pairs: BTreeMap<String, String>,
    selected_left_item: Option<String>,
}

impl AnswerState {
    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    /// Part name → placed label.
    #[must_use]
    pub fn labeled_parts(&self) -> &BTreeMap<String, String> {
        &self.labeled_parts
    }

    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        self.selected_label.as_deref()
    }

    /// Left item → right item.
    #[must_use]
    pub fn matched_pairs(&self) -> &BTreeMap<String, String> {
        &self.matched_pairs
    }

    #[must_use]
    pub fn selected_left_item(&self) -> Option<&str> {
        self.selected_left_item.as_deref()
    }

    pub(crate) fn choose_option(&mut self, option: &str) {
        self.selected_option = Some(option.to_string());
    }

    /// Selecting the pending label again clears it.
    pub(crate) fn toggle_label(&mut self, label: &str) {
        self.selected_label = toggled(self.selected_label.take(), label);
    }

    /// Place the pending label on `part`, moving it off any part it was on.
    pub(crate) fn place_selected_label(&mut self, part: &str) -> bool {
        let Some(label) = self.selected_label.take() else {
            return false;
        };
        self.labeled_parts.retain(|_, placed| *placed != label);
        self.labeled_parts.insert(part.to_string(), label);
        true
    }

    /// Selecting the pending left item again clears it.
    pub(crate) fn toggle_left(&mut self, item: &str) {
        self.selected_left_item = toggled(self.selected_left_item.take(), item);
    }

    /// Pair the pending left item with `item`, unpairing whoever held `item` before.
    pub(crate) fn match_right(&mut self, item: &str) -> bool {
        let Some(left) = self.selected_left_item.take() else {
            return false;
        };
        self.matched_pairs.retain(|_, right| right != item);
        self.matched_pairs.insert(left, item.to_string());
        true
    }
}

fn toggled(current: Option<String>, value: &str) -> Option<String> {
    match current {
        Some(current) if current == value => None,
        _ => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_moves_between_parts() {
        let mut answers = AnswerState::default();
        answers.toggle_label("Stem");
        assert!(answers.place_selected_label("Leaves"));
        assert_eq!(answers.selected_label(), None);

        answers.toggle_label("Stem");
        assert!(answers.place_selected_label("Stem"));

        assert_eq!(answers.labeled_parts().len(), 1);
        assert_eq!(answers.labeled_parts()["Stem"], "Stem");
    }

    #[test]
    fn placing_without_label_is_ignored() {
        let mut answers = AnswerState::default();
        assert!(!answers.place_selected_label("Roots"));
        assert!(answers.labeled_parts().is_empty());
    }

    #[test]
    fn toggling_same_value_clears_selection() {
        let mut answers = AnswerState::default();
        answers.toggle_left("Lion");
        assert_eq!(answers.selected_left_item(), Some("Lion"));
        answers.toggle_left("Lion");
        assert_eq!(answers.selected_left_item(), None);

        answers.toggle_left("Lion");
        answers.toggle_left("Cow");
        assert_eq!(answers.selected_left_item(), Some("Cow"));
    }

    #[test]
    fn right_item_is_matched_once() {
        let mut answers = AnswerState::default();
        answers.toggle_left("Lion");
        answers.match_right("Meat");
        answers.toggle_left("Bear");
        answers.match_right("Meat");

        assert_eq!(answers.matched_pairs().len(), 1);
        assert_eq!(answers.matched_pairs()["Bear"], "Meat");
    }
}
