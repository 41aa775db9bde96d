//! Spelling suggestions over a closed vocabulary.
//!
//! Used for slot values that must be one of a handful of words (job types)
//! and for proposing an existing job when a name is not found. Distance is
//! optimal string alignment (Levenshtein plus adjacent transpositions),
//! compared case-insensitively.

/// Default maximum edit distance for a suggestion.
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Suggests the closest known word for a misspelled one.
#[derive(Debug, Clone)]
pub struct SpellingCorrector {
    vocabulary: Vec<String>,
    max_distance: usize,
}

impl SpellingCorrector {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: words.into_iter().map(Into::into).collect(),
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// True if `word` is in the vocabulary, ignoring case and surrounding whitespace.
    pub fn is_known(&self, word: &str) -> bool {
        let word = word.trim();
        self.vocabulary.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    /// Closest vocabulary word within the distance limit.
    ///
    /// Ties go to the word listed first.
    pub fn correction(&self, word: &str) -> Option<&str> {
        let needle = word.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(usize, &str)> = None;
        for candidate in &self.vocabulary {
            let distance = edit_distance(&needle, &candidate.to_lowercase());
            if distance > self.max_distance {
                continue;
            }
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, candidate.as_str()));
            }
        }
        best.map(|(_, w)| w)
    }

    /// A "did you mean" candidate, or `None` when the word is already known
    /// or nothing is close enough.
    pub fn suggest(&self, word: &str) -> Option<&str> {
        if self.is_known(word) {
            return None;
        }
        self.correction(word)
    }
}

/// Optimal string alignment distance between two strings, by `char`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let width = b.len() + 1;
    let mut d = vec![0usize; (a.len() + 1) * width];
    for i in 0..=a.len() {
        d[i * width] = i;
    }
    for j in 0..=b.len() {
        d[j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut value = (d[(i - 1) * width + j] + 1)
                .min(d[i * width + j - 1] + 1)
                .min(d[(i - 1) * width + j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                value = value.min(d[(i - 2) * width + j - 2] + 1);
            }
            d[i * width + j] = value;
        }
    }
    d[a.len() * width + b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn job_types() -> SpellingCorrector {
        SpellingCorrector::new(["Freestyle", "Pipeline", "Multibranch"])
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("pipeilne", "pipeline"), 1);
    }

    #[test]
    fn known_words_get_no_suggestion() {
        let corrector = job_types();
        assert_eq!(corrector.suggest("Pipeline"), None);
        assert_eq!(corrector.suggest("pipeline"), None);
        assert_eq!(corrector.suggest(" FREESTYLE "), None);
    }

    #[test]
    fn misspelling_gets_closest_word() {
        let corrector = job_types();
        assert_eq!(corrector.suggest("Pipline"), Some("Pipeline"));
        assert_eq!(corrector.suggest("freestlye"), Some("Freestyle"));
        assert_eq!(corrector.suggest("Multibrach"), Some("Multibranch"));
    }

    #[test]
    fn distant_words_get_no_suggestion() {
        let corrector = job_types();
        assert_eq!(corrector.suggest("Matrix"), None);
        assert_eq!(corrector.suggest(""), None);
    }

    #[test]
    fn max_distance_is_configurable() {
        let corrector = job_types().with_max_distance(0);
        assert_eq!(corrector.suggest("Pipline"), None);
    }

    #[test]
    fn empty_vocabulary_never_suggests() {
        let corrector = SpellingCorrector::new(Vec::<String>::new());
        assert_eq!(corrector.suggest("anything"), None);
    }

    proptest! {
        #[test]
        fn suggestions_come_from_vocabulary(word in "[A-Za-z]{0,12}") {
            let corrector = job_types();
            if let Some(s) = corrector.suggest(&word) {
                prop_assert!(corrector.vocabulary().iter().any(|w| w == s));
                prop_assert!(edit_distance(&word.to_lowercase(), &s.to_lowercase()) <= DEFAULT_MAX_DISTANCE);
            }
        }

        #[test]
        fn edit_distance_is_symmetric(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
            prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
        }

        #[test]
        fn known_word_in_any_case_is_accepted(idx in 0usize..3, upper in any::<bool>()) {
            let corrector = job_types();
            let word = corrector.vocabulary()[idx].clone();
            let word = if upper { word.to_uppercase() } else { word.to_lowercase() };
            prop_assert!(corrector.suggest(&word).is_none());
        }
    }
}
