use crate::results::*;
use std::collections::HashSet;
use std::sync::Arc;

/// A letter along with its location in the word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocatedLetter {
    pub letter: char,
    /// The zero-based location (i.e. index) for this letter in a word.
    pub location: u8,
}

impl LocatedLetter {
    pub fn new(letter: char, location: u8) -> LocatedLetter {
        LocatedLetter { letter, location }
    }
}

/// The position-wise constraints implied by a single feedback observation.
///
/// Each guess position contributes one constraint, independently of the
/// others: an exact letter pins its position, a present letter must occur
/// somewhere else, and an absent letter may not occur at all. A word
/// survives iff it satisfies the intersection of all five.
pub struct WordConstraints {
    /// Letters that must occur in specific locations in the word.
    must_contain_here: HashSet<LocatedLetter>,
    /// Letters that must be present, but must be somewhere else in the word.
    must_contain_but_not_here: HashSet<LocatedLetter>,
    /// Letters that must not be in the word.
    must_not_contain: HashSet<char>,
}

impl WordConstraints {
    /// Derives the constraints implied by one `(guess, feedback)`
    /// observation. The guess itself is validated.
    pub fn from_feedback(guess: &str, feedback: &Feedback) -> Result<WordConstraints, AdvisorError> {
        validate_word(guess)?;
        let mut constraints = WordConstraints {
            must_contain_here: HashSet::new(),
            must_contain_but_not_here: HashSet::new(),
            must_not_contain: HashSet::new(),
        };
        for (index, (letter, symbol)) in guess.chars().zip(feedback.symbols()).enumerate() {
            match symbol {
                LetterFeedback::Exact => {
                    constraints
                        .must_contain_here
                        .insert(LocatedLetter::new(letter, index as u8));
                }
                LetterFeedback::Present => {
                    constraints
                        .must_contain_but_not_here
                        .insert(LocatedLetter::new(letter, index as u8));
                }
                LetterFeedback::Absent => {
                    constraints.must_not_contain.insert(letter);
                }
            }
        }
        Ok(constraints)
    }

    /// Returns `true` iff the given word satisfies these constraints.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        self.must_contain_here
            .iter()
            .all(|ll| word.chars().nth(ll.location as usize) == Some(ll.letter))
            && self.must_contain_but_not_here.iter().all(|ll| {
                word.chars().nth(ll.location as usize) != Some(ll.letter)
                    && word.contains(ll.letter)
            })
            && !self
                .must_not_contain
                .iter()
                .any(|letter| word.contains(*letter))
    }
}

/// Narrows `candidates` to the words consistent with one feedback
/// observation.
///
/// The result is a subset of the input, so a candidate set never grows over
/// a game, and reapplying the same `(guess, feedback)` to its own output is
/// a no-op.
pub fn filter_candidates(
    candidates: &[Arc<str>],
    guess: &str,
    feedback: &Feedback,
) -> Result<Vec<Arc<str>>, AdvisorError> {
    let constraints = WordConstraints::from_feedback(guess, feedback)?;
    Ok(candidates
        .iter()
        .filter(|word| constraints.is_satisfied_by(word))
        .map(Arc::clone)
        .collect())
}
