//! A decision-support engine for five-letter word-guessing puzzles.
//!
//! Given a corpus of words with usage frequencies, this library encodes the
//! feedback a guess earns against a hidden answer, narrows the set of words
//! still consistent with every observation, scores the whole guess
//! vocabulary by expected usefulness, and drives a solving loop that
//! converges on the unique answer.
//!
//! ```
//! use rs_wordle_advisor::scorers::{GuessRanker, ScoreMode};
//! use rs_wordle_advisor::{play_simulated, Corpus};
//!
//! let corpus = Corpus::from_iterator(vec!["abcde", "fghij", "abcdf"]).unwrap();
//! let ranker = GuessRanker::new(ScoreMode::RemainingCount);
//! let record = play_simulated(&corpus, ranker, "abcde", "abcdf").unwrap();
//!
//! assert_eq!(record.answer.as_ref(), "abcdf");
//! ```

mod data;
mod engine;
mod restrictions;
mod results;
pub mod scorers;

pub use data::*;
pub use engine::*;
pub use restrictions::*;
pub use results::*;
