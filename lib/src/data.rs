use crate::results::*;
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

/// A word together with its usage frequency and corpus-normalized
/// probability.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub word: Arc<str>,
    /// The usage count from the corpus table. Entries without a count are
    /// imputed to half the smallest count present in the corpus.
    pub frequency: f64,
    /// `frequency` divided by the total frequency of the corpus, so the
    /// probabilities of all entries sum to 1.
    pub probability: f64,
}

/// The immutable catalogue of valid words with usage frequencies.
///
/// A `Corpus` is built once at startup and passed by reference into every
/// component; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    index_by_word: HashMap<Arc<str>, usize>,
}

impl Corpus {
    /// Reads a corpus table with one `word,count[,prob]` line per word.
    ///
    /// A leading `word,count,prob` header line is skipped. The `count` field
    /// may be empty, in which case it is imputed to half the smallest count
    /// present. Any `prob` field is ignored and recomputed, so probabilities
    /// always normalize against the loaded table. Words are converted to
    /// lower case.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Corpus, AdvisorError> {
        let mut rows: Vec<(String, Option<f64>)> = Vec::new();
        for (line_number, maybe_line) in reader.lines().enumerate() {
            let line = maybe_line.map_err(|error| {
                AdvisorError::InvalidInput(format!("corpus line {}: {}", line_number + 1, error))
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let word = fields.next().unwrap_or("").trim();
            if line_number == 0 && word == "word" {
                continue;
            }
            let count_field = fields.next().map(str::trim).unwrap_or("");
            let count = if count_field.is_empty() {
                None
            } else {
                let count = count_field.parse::<f64>().map_err(|_| {
                    AdvisorError::InvalidInput(format!(
                        "corpus line {}: count {:?} is not a number",
                        line_number + 1,
                        count_field
                    ))
                })?;
                Some(count)
            };
            rows.push((word.to_string(), count));
        }
        Corpus::from_word_counts(rows)
    }

    /// Builds a corpus from words with optional usage counts.
    ///
    /// Counts must be non-negative and finite. Missing counts are imputed to
    /// half the smallest count present, or to 1 when no entry carries a
    /// count. Repeated words keep their first occurrence. Fails with
    /// [`AdvisorError::InvalidInput`] when a word is malformed or the corpus
    /// would be empty.
    pub fn from_word_counts<S, I>(words: I) -> Result<Corpus, AdvisorError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Option<f64>)>,
    {
        let mut index_by_word: HashMap<Arc<str>, usize> = HashMap::new();
        let mut rows: Vec<(Arc<str>, Option<f64>)> = Vec::new();
        for (word, count) in words {
            let word = word.as_ref().to_lowercase();
            validate_word(&word)?;
            if let Some(count) = count {
                if !count.is_finite() || count < 0.0 {
                    return Err(AdvisorError::InvalidInput(format!(
                        "count for {:?} must be a non-negative number",
                        word
                    )));
                }
            }
            let word: Arc<str> = Arc::from(word.as_str());
            if index_by_word.contains_key(word.as_ref()) {
                continue;
            }
            index_by_word.insert(Arc::clone(&word), rows.len());
            rows.push((word, count));
        }
        if rows.is_empty() {
            return Err(AdvisorError::InvalidInput(
                "corpus contains no words".to_string(),
            ));
        }

        let minimum_count = rows
            .iter()
            .filter_map(|(_, count)| *count)
            .fold(f64::INFINITY, f64::min);
        let imputed = if minimum_count.is_finite() {
            minimum_count / 2.0
        } else {
            1.0
        };
        let frequencies: Vec<f64> = rows
            .iter()
            .map(|(_, count)| count.unwrap_or(imputed))
            .collect();
        let total: f64 = frequencies.iter().sum();
        let uniform = 1.0 / rows.len() as f64;

        let entries = rows
            .into_iter()
            .zip(frequencies)
            .map(|((word, _), frequency)| {
                // A table of all-zero counts still gets a normalized
                // distribution: fall back to uniform probabilities.
                let probability = if total > 0.0 {
                    frequency / total
                } else {
                    uniform
                };
                CorpusEntry {
                    word,
                    frequency,
                    probability,
                }
            })
            .collect();
        Ok(Corpus {
            entries,
            index_by_word,
        })
    }

    /// Builds a corpus where every word carries the same weight.
    pub fn from_iterator<S, I>(words: I) -> Result<Corpus, AdvisorError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        Corpus::from_word_counts(words.into_iter().map(|word| (word, None)))
    }

    /// Returns the number of corpus words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in load order.
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// The full word list, in load order. This is the initial candidate set
    /// of a game.
    pub fn words(&self) -> Vec<Arc<str>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(&entry.word))
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index_by_word.contains_key(word)
    }

    /// The usage frequency of `word`, if it is a corpus word.
    pub fn frequency(&self, word: &str) -> Option<f64> {
        self.entry(word).map(|entry| entry.frequency)
    }

    /// The normalized probability of `word`, if it is a corpus word.
    pub fn probability(&self, word: &str) -> Option<f64> {
        self.entry(word).map(|entry| entry.probability)
    }

    fn entry(&self, word: &str) -> Option<&CorpusEntry> {
        self.index_by_word.get(word).map(|index| &self.entries[*index])
    }
}
