// LogMon - core/matcher.rs
//
// Error phrase matching over the tail of a log file.
// Core layer: pure logic, no I/O.
//
// Semantics:
//   - Phrases are trimmed; empty phrases never match and never exclude.
//   - Matching is case-insensitive substring containment.
//   - Without exclude phrases the whole tail is searched as one text, so a
//     phrase spanning a newline can match.
//   - With exclude phrases every line containing one of them is dropped,
//     the surviving lines are re-joined with '\n', and the search runs over
//     that filtered text.

/// Line separator used to split and re-join the tail during exclusion.
const LINE_SEPARATOR: &str = "\n";

/// A normalised list of phrases: trimmed, lower-cased, empties removed.
/// Configured order is preserved so the first match is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = raw
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// First phrase contained in the already lower-cased `text_lower`.
    fn first_in(&self, text_lower: &str) -> Option<&str> {
        self.phrases
            .iter()
            .find(|p| text_lower.contains(p.as_str()))
            .map(String::as_str)
    }

    /// True if any phrase occurs in `line` (case-insensitive).
    fn any_in(&self, line: &str) -> bool {
        self.first_in(&line.to_lowercase()).is_some()
    }
}

/// Return the first search phrase (normalised) found in `tail`, after lines
/// containing an exclude phrase have been dropped.
///
/// Phrases are checked in configured order and the scan stops at the first
/// hit.
pub fn first_match<S: AsRef<str>>(
    tail: &str,
    search_words: &[S],
    exclude_words: &[S],
) -> Option<String> {
    let search = PhraseSet::new(search_words);
    let exclude = PhraseSet::new(exclude_words);
    first_match_in(tail, &search, &exclude).map(str::to_string)
}

/// Returns true if `tail` contains an error phrase that is not covered by
/// an exclude phrase on the same line.
pub fn has_error<S: AsRef<str>>(tail: &str, search_words: &[S], exclude_words: &[S]) -> bool {
    first_match(tail, search_words, exclude_words).is_some()
}

/// Match against pre-built phrase sets.
pub fn first_match_in<'a>(
    tail: &str,
    search: &'a PhraseSet,
    exclude: &PhraseSet,
) -> Option<&'a str> {
    if search.is_empty() {
        return None;
    }

    if exclude.is_empty() {
        return search.first_in(&tail.to_lowercase());
    }

    let filtered = tail
        .split(LINE_SEPARATOR)
        .filter(|line| !exclude.any_in(line))
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);

    search.first_in(&filtered.to_lowercase())
}
