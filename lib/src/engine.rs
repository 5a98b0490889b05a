use crate::data::Corpus;
use crate::restrictions::filter_candidates;
use crate::results::*;
use crate::scorers::{GuessRanker, ScoredGuess};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// How many ranked suggestions a turn report carries.
const REPORTED_SUGGESTIONS: usize = 10;

/// Supplies the feedback for each guess the solver makes.
pub trait FeedbackSource {
    /// Produces the feedback `guess` earned against the hidden answer.
    fn feedback_for(&mut self, guess: &str) -> Result<Feedback, AdvisorError>;
}

/// Feedback computed against a known hidden answer, for simulated play.
pub struct SimulatedFeedback {
    answer: String,
}

impl SimulatedFeedback {
    pub fn new(answer: &str) -> Result<SimulatedFeedback, AdvisorError> {
        let answer = answer.to_lowercase();
        validate_word(&answer)?;
        Ok(SimulatedFeedback { answer })
    }
}

impl FeedbackSource for SimulatedFeedback {
    fn feedback_for(&mut self, guess: &str) -> Result<Feedback, AdvisorError> {
        compute_feedback(&self.answer, guess)
    }
}

/// Feedback read from an operator, one `g`/`y`/`r` line per guess.
///
/// Input is validated before it is accepted; a malformed line prints the
/// error and prompts again. The solver loop blocks on the read.
pub struct InteractiveFeedback<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveFeedback<R, W> {
    pub fn new(input: R, output: W) -> InteractiveFeedback<R, W> {
        InteractiveFeedback { input, output }
    }
}

impl<R: BufRead, W: Write> FeedbackSource for InteractiveFeedback<R, W> {
    fn feedback_for(&mut self, guess: &str) -> Result<Feedback, AdvisorError> {
        loop {
            writeln!(
                self.output,
                "I'm guessing: {}. Enter the feedback, with 'g' for exact, 'y' for present \
                 elsewhere, and 'r' for absent (e.g. rgyrr).",
                guess
            )
            .map_err(|error| AdvisorError::InvalidInput(error.to_string()))?;
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|error| AdvisorError::InvalidInput(error.to_string()))?;
            if read == 0 {
                return Err(AdvisorError::InvalidInput(
                    "feedback input ended before the game was solved".to_string(),
                ));
            }
            match Feedback::from_text(line.trim()) {
                Ok(feedback) => return Ok(feedback),
                Err(error) => {
                    writeln!(self.output, "{}. Try again.", error)
                        .map_err(|error| AdvisorError::InvalidInput(error.to_string()))?;
                }
            }
        }
    }
}

/// Whether the solver is still narrowing candidates or has isolated the
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Playing,
    Solved,
}

/// The record of a finished game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// The number of turns taken. A one-word corpus solves in 0 turns.
    pub turns: u32,
    /// Every `(guess, feedback)` pair observed, in play order.
    pub history: Vec<(Arc<str>, Feedback)>,
    /// The single candidate left standing.
    pub answer: Arc<str>,
}

/// A snapshot handed to the turn-report callback after each turn.
pub struct TurnReport<'a> {
    pub turn: u32,
    pub guess: &'a str,
    pub feedback: &'a Feedback,
    /// How many candidates survive the turn's filtering.
    pub remaining: usize,
    /// Ranked suggestions for the next turn, best first. Empty once solved.
    pub top_guesses: &'a [ScoredGuess],
}

pub type TurnReportFn = dyn Fn(&TurnReport);

/// Plays a full game: filter the candidates on each observation, re-rank
/// the vocabulary, and adopt the top suggestion as the next guess.
///
/// The loop has no turn cap; it ends when a single candidate remains, or
/// aborts with [`AdvisorError::NoCandidates`] when an observation empties
/// the candidate set.
pub struct GameSolver<'a> {
    corpus: &'a Corpus,
    ranker: GuessRanker,
    candidates: Vec<Arc<str>>,
    history: Vec<(Arc<str>, Feedback)>,
    turns: u32,
    state: SolverState,
    next_guess: Arc<str>,
    turn_report: Option<Box<TurnReportFn>>,
}

impl<'a> std::fmt::Debug for GameSolver<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSolver")
            .field("corpus", &self.corpus)
            .field("ranker", &self.ranker)
            .field("candidates", &self.candidates)
            .field("history", &self.history)
            .field("turns", &self.turns)
            .field("state", &self.state)
            .field("next_guess", &self.next_guess)
            .field("turn_report", &self.turn_report.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl<'a> GameSolver<'a> {
    /// Starts a game over the full corpus with a caller-supplied first
    /// guess. The first guess need not be a corpus word. A corpus of one
    /// word is already solved.
    pub fn new(
        corpus: &'a Corpus,
        ranker: GuessRanker,
        first_guess: &str,
    ) -> Result<GameSolver<'a>, AdvisorError> {
        let first_guess = first_guess.to_lowercase();
        validate_word(&first_guess)?;
        let candidates = corpus.words();
        let state = if candidates.len() == 1 {
            SolverState::Solved
        } else {
            SolverState::Playing
        };
        Ok(GameSolver {
            corpus,
            ranker,
            candidates,
            history: Vec::new(),
            turns: 0,
            state,
            next_guess: Arc::from(first_guess.as_str()),
            turn_report: None,
        })
    }

    /// Installs a per-turn report callback. Reporting only; the solving
    /// loop does not depend on it.
    pub fn with_turn_report(mut self, report: Box<TurnReportFn>) -> GameSolver<'a> {
        self.turn_report = Some(report);
        self
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// The words still consistent with every observation so far.
    pub fn candidates(&self) -> &[Arc<str>] {
        &self.candidates
    }

    /// Every `(guess, feedback)` pair observed so far, in play order.
    pub fn history(&self) -> &[(Arc<str>, Feedback)] {
        &self.history
    }

    /// The guess the solver will play next.
    pub fn next_guess(&self) -> &str {
        &self.next_guess
    }

    /// Plays one turn against the feedback source and returns the state
    /// after it. A solved game is left untouched.
    pub fn take_turn(&mut self, source: &mut dyn FeedbackSource) -> Result<SolverState, AdvisorError> {
        if self.state == SolverState::Solved {
            return Ok(SolverState::Solved);
        }
        let guess = Arc::clone(&self.next_guess);
        let feedback = source.feedback_for(&guess)?;
        let remaining = filter_candidates(&self.candidates, &guess, &feedback)?;
        if remaining.is_empty() {
            return Err(AdvisorError::NoCandidates);
        }
        self.candidates = remaining;
        self.turns += 1;

        let ranked = if self.candidates.len() == 1 {
            self.state = SolverState::Solved;
            Vec::new()
        } else {
            self.ranker.rank(self.corpus, &self.candidates)?
        };
        if let Some(report) = &self.turn_report {
            let top = ranked.len().min(REPORTED_SUGGESTIONS);
            report(&TurnReport {
                turn: self.turns,
                guess: guess.as_ref(),
                feedback: &feedback,
                remaining: self.candidates.len(),
                top_guesses: &ranked[..top],
            });
        }
        if let Some(best) = ranked.first() {
            self.next_guess = Arc::clone(&best.word);
        }
        self.history.push((guess, feedback));
        Ok(self.state)
    }

    /// Plays turns until the answer is isolated and returns the record.
    pub fn play(mut self, source: &mut dyn FeedbackSource) -> Result<GameRecord, AdvisorError> {
        while self.state == SolverState::Playing {
            self.take_turn(source)?;
        }
        let answer = Arc::clone(&self.candidates[0]);
        Ok(GameRecord {
            turns: self.turns,
            history: self.history,
            answer,
        })
    }
}

/// Plays a simulated game against a known hidden answer.
pub fn play_simulated(
    corpus: &Corpus,
    ranker: GuessRanker,
    first_guess: &str,
    answer: &str,
) -> Result<GameRecord, AdvisorError> {
    let mut source = SimulatedFeedback::new(answer)?;
    GameSolver::new(corpus, ranker, first_guess)?.play(&mut source)
}
