//! "Did you mean" suggestions by edit distance.

/// Largest edit distance still offered as a suggestion.
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// The candidate closest to `name`, if it is a plausible typo.
///
/// A candidate qualifies when its distance is at most
/// [`MAX_SUGGESTION_DISTANCE`] *and* smaller than the length of `name`, so a
/// one- or two-letter name is never "corrected" into an unrelated short name
/// by rewriting all of it. Ties go to the alphabetically first candidate.
pub fn closest_match<'a, I>(name: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let name_len = name.chars().count();
    candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .map(|candidate| (levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE && *distance < name_len)
        .min_by(|(da, ca), (db, cb)| da.cmp(db).then_with(|| ca.cmp(cb)))
        .map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("protagnistName", "protagonistName"), 1);
    }

    #[test]
    fn distance_counts_chars_not_bytes() {
        assert_eq!(levenshtein("héro", "hero"), 1);
    }

    #[test]
    fn suggests_close_name() {
        let candidates = ["protagonistName", "storyTitle", "genre"];
        assert_eq!(
            closest_match("protagnistName", candidates),
            Some("protagonistName")
        );
    }

    #[test]
    fn no_suggestion_beyond_threshold() {
        assert_eq!(closest_match("weather", ["genre", "tense"]), None);
    }

    #[test]
    fn prefers_smallest_distance_then_alphabetical() {
        assert_eq!(closest_match("mood", ["mode", "moody", "food"]), Some("food"));
        assert_eq!(closest_match("tens", ["tense", "tent"]), Some("tense"));
    }

    #[test]
    fn short_names_are_not_rewritten_entirely() {
        // "x" -> "y" is distance 1 but replaces the whole name.
        assert_eq!(closest_match("x", ["y", "z"]), None);
        // "ab" -> "ac" keeps half the name and is suggested.
        assert_eq!(closest_match("ab", ["ac"]), Some("ac"));
        assert_eq!(closest_match("ab", ["xy"]), None);
    }
}
