#[macro_use]
extern crate assert_matches;

use rs_wordle_advisor::scorers::*;
use rs_wordle_advisor::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn count_corpus() -> Corpus {
    Corpus::from_word_counts(vec![
        ("aaaaa", Some(1.0)),
        ("aaaab", Some(7.0)),
        ("zzzzz", Some(1.0)),
    ])
    .unwrap()
}

fn entropy_corpus() -> Corpus {
    Corpus::from_word_counts(vec![
        ("aaaaa", Some(3.0)),
        ("aaaab", Some(1.0)),
        ("zzzzz", Some(4.0)),
    ])
    .unwrap()
}

mod score_estimator {

    use super::*;

    #[test]
    fn remaining_count_averages_surviving_candidates() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let estimator = ScoreEstimator::new(&corpus, ScoreMode::RemainingCount, None);

        // "aaaaa" isolates every hypothetical answer in one turn.
        assert_eq!(estimator.score_guess("aaaaa", &candidates)?, 1.0);
        // "zzzzz" only isolates itself; the other two answers leave both
        // 'a' words standing.
        let score = estimator.score_guess("zzzzz", &candidates)?;
        assert!((score - 5.0 / 3.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn proportional_entropy_weights_answers_by_probability() -> Result<(), AdvisorError> {
        let corpus = entropy_corpus();
        let candidates = corpus.words();
        let estimator = ScoreEstimator::new(&corpus, ScoreMode::ProportionalEntropy, None);

        // Against "zzzzz" the two 'a' answers (half the probability mass)
        // leave {aaaaa: 3, aaaab: 1} standing, an entropy of
        // H(3/4, 1/4) = 0.8112781244591328 bits; the answer "zzzzz" leaves
        // no uncertainty.
        let score = estimator.score_guess("zzzzz", &candidates)?;
        assert!((score - 0.4056390622295664).abs() < 1e-9);

        // "aaaaa" fully separates the corpus, in either direction.
        assert_eq!(estimator.score_guess("aaaaa", &candidates)?, 0.0);
        Ok(())
    }

    #[test]
    fn score_distribution_reports_per_answer_outcomes() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let estimator = ScoreEstimator::new(&corpus, ScoreMode::RemainingCount, None);

        let distribution = estimator.score_distribution("zzzzz", &candidates)?;

        assert_eq!(distribution.scores, vec![2.0, 2.0, 1.0]);
        assert_eq!(distribution.weights, vec![1.0, 1.0, 1.0]);
        assert!((distribution.mean() - 5.0 / 3.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn sampling_restricts_the_answer_population() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let estimator = ScoreEstimator::new(&corpus, ScoreMode::RemainingCount, Some(2));

        let distribution = estimator.score_distribution("aaaaa", &candidates)?;

        assert_eq!(distribution.scores.len(), 2);
        assert_eq!(distribution.weights.len(), 2);
        Ok(())
    }

    #[test]
    fn weighted_sampling_restricts_the_answer_population() -> Result<(), AdvisorError> {
        let corpus = entropy_corpus();
        let candidates = corpus.words();
        let estimator = ScoreEstimator::new(&corpus, ScoreMode::ProportionalEntropy, Some(2));

        let distribution = estimator.score_distribution("aaaaa", &candidates)?;

        assert_eq!(distribution.scores.len(), 2);
        Ok(())
    }

    #[test]
    fn oversized_samples_are_a_configuration_error() {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let estimator = ScoreEstimator::new(&corpus, ScoreMode::RemainingCount, Some(10));

        assert_matches!(
            estimator.score_distribution("aaaaa", &candidates),
            Err(AdvisorError::Configuration(_))
        );
    }
}

mod guess_ranker {

    use super::*;

    #[test]
    fn rank_orders_ascending_by_score() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();

        let ranked = GuessRanker::new(ScoreMode::RemainingCount).rank(&corpus, &candidates)?;

        assert_eq!(ranked.len(), 3);
        // "aaaaa" and "aaaab" tie at 1.0; "aaaab" is the more frequent word.
        assert_eq!(ranked[0].word.as_ref(), "aaaab");
        assert_eq!(ranked[1].word.as_ref(), "aaaaa");
        assert_eq!(ranked[2].word.as_ref(), "zzzzz");
        assert_eq!(ranked[0].score, 1.0);
        assert!((ranked[2].score - 5.0 / 3.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn rank_applies_the_same_convention_in_entropy_mode() -> Result<(), AdvisorError> {
        let corpus = entropy_corpus();
        let candidates = corpus.words();

        let ranked = GuessRanker::new(ScoreMode::ProportionalEntropy).rank(&corpus, &candidates)?;

        // Both 'a' guesses resolve the game outright and tie at 0 bits;
        // "aaaaa" carries the higher frequency.
        assert_eq!(ranked[0].word.as_ref(), "aaaaa");
        assert_eq!(ranked[1].word.as_ref(), "aaaab");
        assert_eq!(ranked[2].word.as_ref(), "zzzzz");
        Ok(())
    }

    #[test]
    fn single_worker_ranking_matches_the_default_pool() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let ranker = GuessRanker::new(ScoreMode::RemainingCount);

        let parallel = ranker.rank(&corpus, &candidates)?;
        let sequential = ranker.rank_with_workers(&corpus, &candidates, 1)?;

        assert_eq!(parallel, sequential);
        Ok(())
    }

    #[test]
    fn rank_scores_guesses_that_are_no_longer_candidates() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        // Only the two 'a' words can still be the answer.
        let candidates: Vec<Arc<str>> = vec![Arc::from("aaaaa"), Arc::from("aaaab")];

        let ranked = GuessRanker::new(ScoreMode::RemainingCount).rank(&corpus, &candidates)?;

        // The whole vocabulary is scored, including "zzzzz".
        assert_eq!(ranked.len(), corpus.len());
        assert!(ranked.iter().any(|scored| scored.word.as_ref() == "zzzzz"));
        Ok(())
    }

    #[test]
    fn oversized_samples_fail_before_fanning_out() {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let ranker = GuessRanker::new(ScoreMode::RemainingCount).with_sample_size(10);

        assert_matches!(
            ranker.rank(&corpus, &candidates),
            Err(AdvisorError::Configuration(_))
        );
    }

    #[test]
    fn progress_reports_every_scored_guess() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_progress = Arc::clone(&calls);
        let ranker = GuessRanker::new(ScoreMode::RemainingCount).with_progress(Box::new(
            move |_scored, total| {
                assert_eq!(total, 3);
                calls_in_progress.fetch_add(1, Ordering::Relaxed);
            },
        ));

        ranker.rank(&corpus, &candidates)?;

        assert_eq!(calls.load(Ordering::Relaxed), 3);
        Ok(())
    }

    #[test]
    fn sample_distributions_cover_the_whole_vocabulary() -> Result<(), AdvisorError> {
        let corpus = count_corpus();
        let candidates = corpus.words();
        let ranker = GuessRanker::new(ScoreMode::RemainingCount);

        let cache = ranker.sample_distributions(&corpus, &candidates)?;

        assert_eq!(cache.len(), corpus.len());
        assert_eq!(cache.get("aaaaa").map(<[f64]>::len), Some(3));
        Ok(())
    }
}

mod distribution_cache {

    use super::*;

    #[test]
    fn ranked_means_sort_ascending() {
        let mut cache = DistributionCache::new();
        cache.insert("aaaaa", vec![2.0, 4.0]);
        cache.insert("bbbbb", vec![1.0]);
        cache.insert("ccccc", vec![2.0, 2.0]);

        let means = cache.ranked_means();

        assert_eq!(
            means,
            vec![
                ("bbbbb".to_string(), 1.0),
                ("ccccc".to_string(), 2.0),
                ("aaaaa".to_string(), 3.0),
            ]
        );
    }

    #[test]
    fn cache_lookup_tolerates_unknown_words() {
        let cache = DistributionCache::new();

        assert!(cache.is_empty());
        assert_eq!(cache.get("aaaaa"), None);
    }
}
