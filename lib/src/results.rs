use std::error;
use std::fmt;

/// Every word in the puzzle is exactly this long.
pub const WORD_LENGTH: usize = 5;

/// The classification of a single guess letter against the hidden answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterFeedback {
    /// The letter is in the answer at this position.
    Exact,
    /// The letter occurs somewhere in the answer, but not at this position.
    Present,
    /// The letter does not occur anywhere in the answer.
    Absent,
}

/// Feedback for a full guess, one symbol per letter position.
///
/// The textual form uses `g` for [`LetterFeedback::Exact`], `y` for
/// [`LetterFeedback::Present`] and `r` for [`LetterFeedback::Absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feedback {
    symbols: [LetterFeedback; WORD_LENGTH],
}

impl Feedback {
    pub fn new(symbols: [LetterFeedback; WORD_LENGTH]) -> Feedback {
        Feedback { symbols }
    }

    /// The per-position symbols, in guess order.
    pub fn symbols(&self) -> &[LetterFeedback; WORD_LENGTH] {
        &self.symbols
    }

    /// Returns `true` iff every position is [`LetterFeedback::Exact`].
    pub fn is_all_exact(&self) -> bool {
        self.symbols
            .iter()
            .all(|symbol| *symbol == LetterFeedback::Exact)
    }

    /// Parses the textual form, e.g. `"rgggg"`.
    ///
    /// Fails with [`AdvisorError::InvalidInput`] when the text is not exactly
    /// [`WORD_LENGTH`] symbols or contains a character other than `g`, `y`,
    /// or `r`.
    pub fn from_text(text: &str) -> Result<Feedback, AdvisorError> {
        if text.chars().count() != WORD_LENGTH {
            return Err(AdvisorError::InvalidInput(format!(
                "feedback {:?} must be exactly {} symbols",
                text, WORD_LENGTH
            )));
        }
        let mut symbols = [LetterFeedback::Absent; WORD_LENGTH];
        for (index, letter) in text.chars().enumerate() {
            symbols[index] = match letter {
                'g' => LetterFeedback::Exact,
                'y' => LetterFeedback::Present,
                'r' => LetterFeedback::Absent,
                _ => {
                    return Err(AdvisorError::InvalidInput(format!(
                        "unknown feedback symbol {:?}, expected 'g', 'y', or 'r'",
                        letter
                    )))
                }
            };
        }
        Ok(Feedback { symbols })
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            let letter = match symbol {
                LetterFeedback::Exact => 'g',
                LetterFeedback::Present => 'y',
                LetterFeedback::Absent => 'r',
            };
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

/// Computes the feedback `guess` earns against the known `answer`.
///
/// Per position: an exact match is [`LetterFeedback::Exact`]; otherwise a
/// letter occurring anywhere in the answer is [`LetterFeedback::Present`];
/// otherwise [`LetterFeedback::Absent`]. Note that this check is
/// per-position: a guess letter repeated more often than the answer holds it
/// is still marked `Present` at every non-exact position.
pub fn compute_feedback(answer: &str, guess: &str) -> Result<Feedback, AdvisorError> {
    validate_word(answer)?;
    validate_word(guess)?;
    let answer_bytes = answer.as_bytes();
    let mut symbols = [LetterFeedback::Absent; WORD_LENGTH];
    for (index, letter) in guess.bytes().enumerate() {
        symbols[index] = if answer_bytes[index] == letter {
            LetterFeedback::Exact
        } else if answer_bytes.contains(&letter) {
            LetterFeedback::Present
        } else {
            LetterFeedback::Absent
        };
    }
    Ok(Feedback { symbols })
}

/// Checks that `word` is exactly [`WORD_LENGTH`] ASCII letters.
pub(crate) fn validate_word(word: &str) -> Result<(), AdvisorError> {
    if word.len() != WORD_LENGTH || !word.bytes().all(|letter| letter.is_ascii_alphabetic()) {
        return Err(AdvisorError::InvalidInput(format!(
            "word {:?} must be exactly {} alphabetic characters",
            word, WORD_LENGTH
        )));
    }
    Ok(())
}

/// Indicates that an advisor operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// A word or feedback string was malformed: wrong length or alphabet.
    InvalidInput(String),
    /// Filtering produced an empty candidate set. The feedback observed so
    /// far contradicts the corpus, or the answer is not a corpus word.
    NoCandidates,
    /// A parallel scoring task or its worker pool failed. The whole ranking
    /// pass is aborted.
    WorkerFailure(String),
    /// A request was inconsistent with the data, e.g. a sample size larger
    /// than the candidate population.
    Configuration(String),
}

impl fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisorError::InvalidInput(message) => write!(f, "invalid input: {}", message),
            AdvisorError::NoCandidates => {
                write!(f, "no candidate words remain consistent with the feedback")
            }
            AdvisorError::WorkerFailure(message) => write!(f, "ranking worker failed: {}", message),
            AdvisorError::Configuration(message) => write!(f, "configuration error: {}", message),
        }
    }
}

impl error::Error for AdvisorError {}
