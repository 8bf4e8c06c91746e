use thiserror::Error;

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// The learner's in-progress selections for one quiz-taking session.
///
/// One slot per question, filled incrementally; a slot stays empty until
/// the learner answers that question. The sheet is created fresh per
/// session and discarded on navigation or retake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    slots: Vec<Option<usize>>,
}

impl AnswerSheet {
    /// Create an empty sheet with one slot per question.
    #[must_use]
    pub fn new(question_count: usize) -> Self {
        Self {
            slots: vec![None; question_count],
        }
    }

    /// Record the selected option for a question, overwriting any earlier
    /// selection for the same slot.
    ///
    /// # Errors
    ///
    /// Returns `AnswerSheetError::QuestionOutOfRange` when the index does
    /// not address a slot.
    pub fn select(&mut self, question_index: usize, option: usize) -> Result<(), AnswerSheetError> {
        let question_count = self.slots.len();
        let slot = self
            .slots
            .get_mut(question_index)
            .ok_or(AnswerSheetError::QuestionOutOfRange {
                index: question_index,
                question_count,
            })?;
        *slot = Some(option);
        Ok(())
    }

    /// The recorded selection for a question, if any.
    #[must_use]
    pub fn selected(&self, question_index: usize) -> Option<usize> {
        self.slots.get(question_index).copied().flatten()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether every slot has a selection.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The full ordered selection list, required by the remote submission
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AnswerSheetError::Incomplete` if any slot is still empty.
    pub fn to_submission(&self) -> Result<Vec<usize>, AnswerSheetError> {
        self.slots
            .iter()
            .copied()
            .collect::<Option<Vec<usize>>>()
            .ok_or(AnswerSheetError::Incomplete {
                answered: self.answered_count(),
                total: self.slots.len(),
            })
    }

    /// Drop all selections, keeping the slot count. Used on retake.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerSheetError {
    #[error("question index {index} is out of range for {question_count} questions")]
    QuestionOutOfRange { index: usize, question_count: usize },

    #[error("answer sheet is incomplete: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_slots_incrementally() {
        let mut sheet = AnswerSheet::new(3);
        assert_eq!(sheet.answered_count(), 0);
        assert!(!sheet.is_complete());

        sheet.select(0, 2).unwrap();
        sheet.select(2, 1).unwrap();
        assert_eq!(sheet.answered_count(), 2);
        assert_eq!(sheet.selected(0), Some(2));
        assert_eq!(sheet.selected(1), None);
        assert!(!sheet.is_complete());

        sheet.select(1, 0).unwrap();
        assert!(sheet.is_complete());
        assert_eq!(sheet.to_submission().unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn reselect_overwrites_previous_choice() {
        let mut sheet = AnswerSheet::new(1);
        sheet.select(0, 0).unwrap();
        sheet.select(0, 3).unwrap();
        assert_eq!(sheet.selected(0), Some(3));
    }

    #[test]
    fn rejects_out_of_range_question() {
        let mut sheet = AnswerSheet::new(2);
        let err = sheet.select(2, 0).unwrap_err();
        assert_eq!(
            err,
            AnswerSheetError::QuestionOutOfRange {
                index: 2,
                question_count: 2
            }
        );
    }

    #[test]
    fn incomplete_sheet_cannot_be_submitted() {
        let mut sheet = AnswerSheet::new(2);
        sheet.select(0, 1).unwrap();
        let err = sheet.to_submission().unwrap_err();
        assert_eq!(err, AnswerSheetError::Incomplete { answered: 1, total: 2 });
    }

    #[test]
    fn clear_resets_for_retake() {
        let mut sheet = AnswerSheet::new(2);
        sheet.select(0, 1).unwrap();
        sheet.select(1, 0).unwrap();
        sheet.clear();
        assert_eq!(sheet.answered_count(), 0);
        assert_eq!(sheet.question_count(), 2);
    }
}
