use invex_client::ChatTurn;

/// One question and its answer; the answer stays empty while pending or after a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

/// Ordered chat turns. Only grows, except for answers being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending turn and return its index.
    pub fn push_pending(&mut self, question: impl Into<String>) -> usize {
        self.turns.push(Turn {
            question: question.into(),
            answer: String::new(),
        });
        self.turns.len() - 1
    }

    /// Wire history of all turns before `index`.
    #[must_use]
    pub fn history_before(&self, index: usize) -> Vec<ChatTurn> {
        self.turns
            .iter()
            .take(index)
            .map(|t| ChatTurn {
                user: t.question.clone(),
                ai: t.answer.clone(),
            })
            .collect()
    }

    /// Set the answer of turn `index`. Returns `false` for an unknown index.
    pub fn answer(&mut self, index: usize, answer: impl Into<String>) -> bool {
        match self.turns.get_mut(index) {
            Some(turn) => {
                turn.answer = answer.into();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_excludes_new_turn() {
        let mut transcript = Transcript::new();
        let first = transcript.push_pending("vendor?");
        transcript.answer(first, "ACME");
        let second = transcript.push_pending("total?");

        let history = transcript.history_before(second);
        assert_eq!(
            history,
            vec![ChatTurn {
                user: "vendor?".into(),
                ai: "ACME".into()
            }]
        );
    }

    #[test]
    fn pending_turns_are_sent_with_empty_answer() {
        let mut transcript = Transcript::new();
        transcript.push_pending("a");
        let second = transcript.push_pending("b");
        assert_eq!(transcript.history_before(second)[0].ai, "");
    }

    #[test]
    fn answers_land_in_their_own_turn() {
        let mut transcript = Transcript::new();
        let a = transcript.push_pending("a");
        let b = transcript.push_pending("b");
        assert!(transcript.answer(b, "second"));
        assert!(transcript.answer(a, "first"));
        assert_eq!(transcript.turns()[0].answer, "first");
        assert_eq!(transcript.turns()[1].answer, "second");
        assert!(!transcript.answer(7, "lost"));
    }
}
