//! Fuzzy ranking of history entries.

use crate::completion::Suggestion;
use crate::history::RankedSnapshot;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// One candidate accepted by a [`FuzzyFinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Position of the candidate in the pool that was searched.
    pub index: usize,
    pub score: i64,
}

/// Subsequence matching of a query against a pool of candidates.
///
/// Implementations return only candidates containing the query's characters in order
/// (not necessarily contiguous), best score first. Equal scores must come back in a
/// deterministic order for identical inputs.
pub trait FuzzyFinder {
    fn find(&self, query: &str, pool: &[&str]) -> Vec<FuzzyMatch>;
}

/// [`FuzzyFinder`] backed by the skim matching algorithm. Ties keep pool order.
#[derive(Default)]
pub struct SkimFinder {
    matcher: SkimMatcherV2,
}

impl FuzzyFinder for SkimFinder {
    fn find(&self, query: &str, pool: &[&str]) -> Vec<FuzzyMatch> {
        let mut matches: Vec<FuzzyMatch> = pool
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.matcher
                    .fuzzy_match(candidate, query)
                    .map(|score| FuzzyMatch { index, score })
            })
            .collect();
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}

/// Turns a query and a history snapshot into annotated suggestions.
pub struct Ranker<F = SkimFinder> {
    finder: F,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(SkimFinder::default())
    }
}

impl<F: FuzzyFinder> Ranker<F> {
    pub fn new(finder: F) -> Self {
        Self { finder }
    }

    /// Fuzzy-match `input` against every command in `snapshot`.
    ///
    /// Suggestions come back in the finder's order, each annotated with how often the
    /// command was used. An empty input matches nothing.
    pub fn suggest(&self, input: &str, snapshot: &RankedSnapshot) -> Vec<Suggestion> {
        if input.is_empty() {
            return Vec::new();
        }
        let pool: Vec<&str> = snapshot.iter().map(|e| e.text.as_str()).collect();
        self.finder
            .find(input, &pool)
            .into_iter()
            .filter_map(|m| snapshot.get(m.index))
            .map(|entry| Suggestion {
                display_text: entry.text.clone(),
                annotation: format!("used {} times", entry.frequency),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;

    fn snapshot(entries: &[(&str, u32)]) -> RankedSnapshot {
        RankedSnapshot::from(
            entries
                .iter()
                .map(|&(text, frequency)| HistoryEntry {
                    text: text.to_string(),
                    frequency,
                })
                .collect::<Vec<_>>(),
        )
    }

    fn skim() -> Ranker {
        Ranker::default()
    }

    /// Accepts every candidate and scores later pool positions higher.
    struct Reversed;

    impl FuzzyFinder for Reversed {
        fn find(&self, _query: &str, pool: &[&str]) -> Vec<FuzzyMatch> {
            (0..pool.len())
                .rev()
                .map(|index| FuzzyMatch {
                    index,
                    score: index as i64,
                })
                .collect()
        }
    }

    #[test]
    fn test_subsequence_matches_carry_their_own_frequency() {
        let snap = snapshot(&[("git status", 5), ("git pull", 2), ("ls", 9)]);
        let got = skim().suggest("gt", &snap);

        assert_eq!(got.len(), 2);
        let status = got.iter().find(|s| s.display_text == "git status").unwrap();
        let pull = got.iter().find(|s| s.display_text == "git pull").unwrap();
        assert_eq!(status.annotation, "used 5 times");
        assert_eq!(pull.annotation, "used 2 times");
    }

    #[test]
    fn test_finder_order_is_preserved_and_mapped_by_index() {
        let snap = snapshot(&[("a", 3), ("b", 2), ("c", 1)]);
        let got = Ranker::new(Reversed).suggest("x", &snap);

        let pairs: Vec<(&str, &str)> = got
            .iter()
            .map(|s| (s.display_text.as_str(), s.annotation.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("c", "used 1 times"),
                ("b", "used 2 times"),
                ("a", "used 3 times")
            ]
        );
    }

    #[test]
    fn test_empty_input_or_history_gives_nothing() {
        let snap = snapshot(&[("git status", 1)]);
        assert!(skim().suggest("", &snap).is_empty());
        assert!(
            skim()
                .suggest("git", &RankedSnapshot::default())
                .is_empty()
        );
    }

    #[test]
    fn test_skim_finder_rejects_out_of_order_characters() {
        let finder = SkimFinder::default();
        let got = finder.find("tg", &["git", "tag"]);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].index, 1);
    }

    #[test]
    fn test_skim_finder_is_deterministic() {
        let finder = SkimFinder::default();
        let pool = ["make test", "make", "cargo make"];
        assert_eq!(finder.find("make", &pool), finder.find("make", &pool));
    }
}
