use std::ops::Deref;

/// ReviewCorpus is the ordered list of reviews loaded from the dataset.
///
/// Every entry is trimmed and non-empty; the only way in is [`ReviewCorpus::from_values`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCorpus(Vec<String>);

impl ReviewCorpus {
    /// Builds a corpus from raw cell values.
    ///
    /// * `values` - cell values, `None` stands for a missing cell.
    ///
    /// # Returns
    /// Corpus holding the trimmed, non-empty values in their original order.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        Self(
            values
                .into_iter()
                .map(|v| normalize_text(v.as_ref().map(|s| s.as_ref())))
                .filter(|v| !v.is_empty())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for ReviewCorpus {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Treats a missing value as empty and trims the rest.
pub fn normalize_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(Some("  spaced out \t")), "spaced out");
        assert_eq!(normalize_text(Some("\n")), "");
    }

    #[test]
    fn test_corpus_drops_blank_entries() {
        let corpus = ReviewCorpus::from_values(vec![
            Some("first"),
            None,
            Some("   "),
            Some(" second "),
            Some(""),
        ]);
        assert_eq!(corpus.as_slice(), ["first", "second"]);
        assert_eq!(corpus.len(), 2);
        assert!(corpus.iter().all(|r| !r.trim().is_empty()));
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = ReviewCorpus::from_values(Vec::<Option<String>>::new());
        assert!(corpus.is_empty());
        assert_eq!(corpus, ReviewCorpus::default());
    }
}
