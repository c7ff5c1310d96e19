//! Byte-pattern substitution engine.
//!
//! Pure function from `(bytes, ordered rules)` to transformed bytes. Each
//! rule scans left-to-right for non-overlapping occurrences of its pattern
//! and replaces them; a later rule runs on the complete output of the
//! previous one. An empty pattern is an end-of-list sentinel.

use crate::config::SubstitutionRule;

/// Apply every rule in order to `input`, stopping early at the first rule
/// whose pattern is empty.
pub fn substitute(input: &[u8], rules: &[SubstitutionRule]) -> Vec<u8> {
    let mut acc = input.to_vec();
    for rule in rules {
        if rule.pattern.is_empty() {
            break;
        }
        acc = apply_rule(&acc, &rule.pattern, &rule.replacement);
    }
    acc
}

/// Replace non-overlapping occurrences of `pattern` in `input` with
/// `replacement`. The replacement is never re-scanned.
fn apply_rule(input: &[u8], pattern: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i..].starts_with(pattern) {
            out.extend_from_slice(replacement);
            i += pattern.len();
        } else {
            out.push(input[i]);
            i += 1;
        }
    }
    out
}

/// Apply `substitute`, then clamp the result to `max_len` bytes if a
/// pathological rule set would otherwise overflow the per-chunk output
/// bound. Returns the (possibly truncated) bytes and whether truncation
/// occurred, so the caller can log it.
pub fn substitute_bounded(input: &[u8], rules: &[SubstitutionRule], max_len: usize) -> (Vec<u8>, bool) {
    let mut out = substitute(input, rules);
    if out.len() > max_len {
        out.truncate(max_len);
        (out, true)
    } else {
        (out, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str) -> SubstitutionRule {
        SubstitutionRule {
            pattern: pattern.as_bytes().to_vec(),
            replacement: replacement.as_bytes().to_vec(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let rules = vec![rule("a", "b")];
        assert_eq!(substitute(b"", &rules), Vec::<u8>::new());
    }

    #[test]
    fn non_overlapping_left_to_right() {
        let rules = vec![rule("aa", "b")];
        assert_eq!(substitute(b"aaaa", &rules), b"bb");
    }

    #[test]
    fn pattern_longer_than_remaining_input_does_not_match() {
        let rules = vec![rule("abcdef", "x")];
        assert_eq!(substitute(b"abc", &rules), b"abc");
    }

    #[test]
    fn replacement_is_not_rescanned() {
        // Replacing "a" with "aa" must not loop forever or re-match the
        // freshly inserted "aa".
        let rules = vec![rule("a", "aa")];
        assert_eq!(substitute(b"a", &rules), b"aa");
    }

    #[test]
    fn rule_order_matters() {
        let forward = vec![rule("a", "b"), rule("b", "c")];
        assert_eq!(substitute(b"a", &forward), b"c");

        let reversed = vec![rule("b", "c"), rule("a", "b")];
        assert_eq!(substitute(b"a", &reversed), b"b");
    }

    #[test]
    fn empty_pattern_terminates_rule_processing() {
        let rules = vec![
            SubstitutionRule { pattern: vec![], replacement: vec![] },
            rule("a", "z"),
        ];
        assert_eq!(substitute(b"a", &rules), b"a");
    }

    #[test]
    fn cascades_across_rules() {
        // (a -> bb), (b -> c): "a" becomes "bb" then "cc".
        let rules = vec![rule("a", "bb"), rule("b", "c")];
        assert_eq!(substitute(b"a", &rules), b"cc");
    }

    #[test]
    fn deterministic_across_repeated_calls() {
        let rules = vec![rule("cat", "dog")];
        let input = b"the cat sat on the cat mat";
        assert_eq!(substitute(input, &rules), substitute(input, &rules));
    }

    #[test]
    fn reverse_direction_rule_with_no_further_match_is_a_no_op() {
        // Mirrors scenario S2: echoing "the dog sat" back through the same
        // rule finds no further "cat" to replace.
        let rules = vec![rule("cat", "dog")];
        assert_eq!(substitute(b"the dog sat\n", &rules), b"the dog sat\n");
    }

    #[test]
    fn bounded_truncates_and_reports_it() {
        let rules = vec![rule("a", "aaaaaaaaaa")];
        let (out, truncated) = substitute_bounded(b"aaaa", &rules, 8);
        assert!(truncated);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn bounded_leaves_small_output_untouched() {
        let rules = vec![rule("cat", "dog")];
        let (out, truncated) = substitute_bounded(b"cat", &rules, 1024);
        assert!(!truncated);
        assert_eq!(out, b"dog");
    }
}
