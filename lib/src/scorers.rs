//! Guess scoring, vocabulary ranking, and the parallel evaluation pool.

use crate::data::Corpus;
use crate::restrictions::filter_candidates;
use crate::results::*;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a guess is scored against the surviving candidates.
///
/// In both modes a lower score is a better guess, so rankings from either
/// mode sort ascending. Scores from different modes are never comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// The expected number of candidates that would remain after the guess,
    /// averaging uniformly over the hypothetical answers.
    RemainingCount,
    /// The expected residual entropy, in bits, of the surviving candidates'
    /// probability mass, weighting each hypothetical answer by its corpus
    /// probability.
    ProportionalEntropy,
}

/// The per-hypothetical-answer outcomes of scoring one guess.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDistribution {
    /// One score contribution per sampled hypothetical answer.
    pub scores: Vec<f64>,
    /// The averaging weight of each contribution: uniform in
    /// [`ScoreMode::RemainingCount`], the answer's corpus probability in
    /// [`ScoreMode::ProportionalEntropy`].
    pub weights: Vec<f64>,
}

impl ScoreDistribution {
    /// The weight-normalized mean of the contributions.
    pub fn mean(&self) -> f64 {
        let total_weight: f64 = self.weights.iter().sum();
        if total_weight == 0.0 {
            return 0.0;
        }
        self.scores
            .iter()
            .zip(&self.weights)
            .map(|(score, weight)| score * weight)
            .sum::<f64>()
            / total_weight
    }
}

/// Scores a single guess against a candidate set.
///
/// For each hypothetical answer drawn from the candidates, the estimator
/// computes the feedback the guess would earn, filters the candidates on it,
/// and measures what is left, per [`ScoreMode`]. An optional sample size
/// restricts the hypothetical-answer population to a random subset: uniform
/// in count mode, frequency-weighted in proportional mode. Draws use the
/// thread-local RNG and are not reproducible across runs.
pub struct ScoreEstimator<'a> {
    corpus: &'a Corpus,
    mode: ScoreMode,
    sample_size: Option<usize>,
}

impl<'a> ScoreEstimator<'a> {
    pub fn new(corpus: &'a Corpus, mode: ScoreMode, sample_size: Option<usize>) -> ScoreEstimator<'a> {
        ScoreEstimator {
            corpus,
            mode,
            sample_size,
        }
    }

    /// Scores `guess`: the weighted average of the per-answer outcomes.
    pub fn score_guess(&self, guess: &str, candidates: &[Arc<str>]) -> Result<f64, AdvisorError> {
        Ok(self.score_distribution(guess, candidates)?.mean())
    }

    /// Computes the per-hypothetical-answer outcomes for `guess`.
    ///
    /// Fails with [`AdvisorError::Configuration`] when the requested sample
    /// size exceeds the candidate population.
    pub fn score_distribution(
        &self,
        guess: &str,
        candidates: &[Arc<str>],
    ) -> Result<ScoreDistribution, AdvisorError> {
        validate_word(guess)?;
        let answers = self.sample_answers(candidates)?;
        let mut scores = Vec::with_capacity(answers.len());
        let mut weights = Vec::with_capacity(answers.len());
        for answer in &answers {
            let feedback = compute_feedback(answer, guess)?;
            let remaining = filter_candidates(candidates, guess, &feedback)?;
            match self.mode {
                ScoreMode::RemainingCount => {
                    scores.push(remaining.len() as f64);
                    weights.push(1.0);
                }
                ScoreMode::ProportionalEntropy => {
                    scores.push(self.candidate_entropy(&remaining));
                    weights.push(self.corpus.probability(answer).unwrap_or(0.0));
                }
            }
        }
        Ok(ScoreDistribution { scores, weights })
    }

    fn sample_answers(&self, candidates: &[Arc<str>]) -> Result<Vec<Arc<str>>, AdvisorError> {
        let size = match self.sample_size {
            None => return Ok(candidates.to_vec()),
            Some(size) => size,
        };
        if size > candidates.len() {
            return Err(AdvisorError::Configuration(format!(
                "sample size {} exceeds the {} available candidates",
                size,
                candidates.len()
            )));
        }
        let mut rng = rand::thread_rng();
        match self.mode {
            ScoreMode::RemainingCount => Ok(candidates
                .choose_multiple(&mut rng, size)
                .map(Arc::clone)
                .collect()),
            ScoreMode::ProportionalEntropy => candidates
                .choose_multiple_weighted(&mut rng, size, |word| {
                    self.corpus.frequency(word).unwrap_or(0.0)
                })
                .map(|chosen| chosen.map(Arc::clone).collect())
                .map_err(|error| {
                    AdvisorError::Configuration(format!("weighted sampling failed: {}", error))
                }),
        }
    }

    /// Entropy in bits of the candidates' corpus probability mass,
    /// normalized within the set.
    fn candidate_entropy(&self, candidates: &[Arc<str>]) -> f64 {
        let frequencies: Vec<f64> = candidates
            .iter()
            .map(|word| self.corpus.frequency(word).unwrap_or(0.0))
            .collect();
        let total: f64 = frequencies.iter().sum();
        if total == 0.0 {
            // All-zero counts: treat the mass as uniform.
            if candidates.len() <= 1 {
                return 0.0;
            }
            return (candidates.len() as f64).log2();
        }
        -frequencies
            .iter()
            .filter(|frequency| **frequency > 0.0)
            .map(|frequency| {
                let p = frequency / total;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

/// A guess together with its computed score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGuess {
    pub word: Arc<str>,
    pub score: f64,
}

/// Called with `(scored, total)` as per-guess scoring completes.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Scores the entire guess vocabulary against a candidate set and orders the
/// results, best guess first.
///
/// Every corpus word is scored, whether or not it is still a surviving
/// candidate: a word that cannot be the answer can still split the
/// candidates well. Results sort ascending by score, breaking ties by
/// descending corpus frequency and then by word, so the ordering is
/// deterministic regardless of how the parallel workers finish.
pub struct GuessRanker {
    mode: ScoreMode,
    sample_size: Option<usize>,
    progress: Option<Box<ProgressFn>>,
}

impl std::fmt::Debug for GuessRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuessRanker")
            .field("mode", &self.mode)
            .field("sample_size", &self.sample_size)
            .field("progress", &self.progress.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl GuessRanker {
    pub fn new(mode: ScoreMode) -> GuessRanker {
        GuessRanker {
            mode,
            sample_size: None,
            progress: None,
        }
    }

    /// Restricts each guess's hypothetical-answer population to `size`
    /// random draws.
    pub fn with_sample_size(mut self, size: usize) -> GuessRanker {
        self.sample_size = Some(size);
        self
    }

    /// Installs a progress callback, called from the worker threads as
    /// guesses finish scoring. Reporting only; the ranking result does not
    /// depend on it.
    pub fn with_progress(mut self, progress: Box<ProgressFn>) -> GuessRanker {
        self.progress = Some(progress);
        self
    }

    /// Ranks every corpus word against `candidates` on the default worker
    /// pool.
    pub fn rank(
        &self,
        corpus: &Corpus,
        candidates: &[Arc<str>],
    ) -> Result<Vec<ScoredGuess>, AdvisorError> {
        self.rank_with_workers(corpus, candidates, default_worker_count())
    }

    /// Ranks on a dedicated pool of exactly `workers` threads.
    ///
    /// Scoring tasks are pure functions of the read-only corpus and
    /// candidates, so any worker count produces the same output. A failed
    /// task aborts the whole pass with [`AdvisorError::WorkerFailure`].
    pub fn rank_with_workers(
        &self,
        corpus: &Corpus,
        candidates: &[Arc<str>],
        workers: usize,
    ) -> Result<Vec<ScoredGuess>, AdvisorError> {
        self.check_sample_size(candidates)?;
        let estimator = ScoreEstimator::new(corpus, self.mode, self.sample_size);
        let completed = AtomicUsize::new(0);
        let total = corpus.len();
        let pool = build_worker_pool(workers)?;
        let mut ranked = pool.install(|| {
            corpus
                .entries()
                .par_iter()
                .map(|entry| {
                    let score = estimator
                        .score_guess(&entry.word, candidates)
                        .map_err(|error| AdvisorError::WorkerFailure(error.to_string()))?;
                    if let Some(progress) = &self.progress {
                        progress(completed.fetch_add(1, Ordering::Relaxed) + 1, total);
                    }
                    Ok(ScoredGuess {
                        word: Arc::clone(&entry.word),
                        score,
                    })
                })
                .collect::<Result<Vec<ScoredGuess>, AdvisorError>>()
        })?;
        sort_ranked(&mut ranked, corpus);
        Ok(ranked)
    }

    /// Samples a score distribution for every corpus word, producing the
    /// cacheable artifact used to shortlist starting guesses.
    pub fn sample_distributions(
        &self,
        corpus: &Corpus,
        candidates: &[Arc<str>],
    ) -> Result<DistributionCache, AdvisorError> {
        self.check_sample_size(candidates)?;
        let estimator = ScoreEstimator::new(corpus, self.mode, self.sample_size);
        let pool = build_worker_pool(default_worker_count())?;
        let samples = pool.install(|| {
            corpus
                .entries()
                .par_iter()
                .map(|entry| {
                    let distribution = estimator
                        .score_distribution(&entry.word, candidates)
                        .map_err(|error| AdvisorError::WorkerFailure(error.to_string()))?;
                    Ok((entry.word.to_string(), distribution.scores))
                })
                .collect::<Result<HashMap<String, Vec<f64>>, AdvisorError>>()
        })?;
        Ok(DistributionCache { samples })
    }

    fn check_sample_size(&self, candidates: &[Arc<str>]) -> Result<(), AdvisorError> {
        if let Some(size) = self.sample_size {
            if size > candidates.len() {
                return Err(AdvisorError::Configuration(format!(
                    "sample size {} exceeds the {} available candidates",
                    size,
                    candidates.len()
                )));
            }
        }
        Ok(())
    }
}

/// One worker per available core, leaving one core for the caller. At least
/// one.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|count| count.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

fn build_worker_pool(workers: usize) -> Result<rayon::ThreadPool, AdvisorError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|error| AdvisorError::WorkerFailure(error.to_string()))
}

fn sort_ranked(ranked: &mut [ScoredGuess], corpus: &Corpus) {
    ranked.sort_unstable_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| {
                let frequency_a = corpus.frequency(&a.word).unwrap_or(0.0);
                let frequency_b = corpus.frequency(&b.word).unwrap_or(0.0);
                frequency_b.total_cmp(&frequency_a)
            })
            .then_with(|| a.word.cmp(&b.word))
    });
}

/// Previously sampled score distributions, keyed by guess word.
///
/// Consumers use this to skip recomputation when shortlisting starting
/// guesses. The cache carries no link back to the corpus it was sampled
/// from, so consumers must tolerate staleness; there is no invalidation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistributionCache {
    samples: HashMap<String, Vec<f64>>,
}

impl DistributionCache {
    pub fn new() -> DistributionCache {
        DistributionCache::default()
    }

    pub fn insert(&mut self, word: impl Into<String>, scores: Vec<f64>) {
        self.samples.insert(word.into(), scores);
    }

    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.samples.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(word, mean sampled score)` pairs, ascending by mean, ties by word.
    pub fn ranked_means(&self) -> Vec<(String, f64)> {
        let mut means: Vec<(String, f64)> = self
            .samples
            .iter()
            .map(|(word, scores)| {
                let mean = if scores.is_empty() {
                    0.0
                } else {
                    scores.iter().sum::<f64>() / scores.len() as f64
                };
                (word.clone(), mean)
            })
            .collect();
        means.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        means
    }
}
