//! Sequence-matching similarity for "did you mean" suggestions.
//!
//! Implements the Ratcliff/Obershelp "gestalt pattern matching" ratio:
//! find the longest common block, recurse on the pieces to its left and
//! right, and score `2 * matched / (len(a) + len(b))`. Among equally long
//! blocks the one starting earliest in `a`, then earliest in `b`, wins, so
//! scores are deterministic.

/// Similarity ratio of two strings in `0.0..=1.0`.
///
/// Two empty strings are identical and score `1.0`. Swapping the
/// arguments can change the score, since ties between equally long blocks
/// are broken by position in `a`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total characters covered by the recursive matching blocks.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }

    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Returns `(start_a, start_b, len)` of the longest common contiguous run.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // prev[j + 1] = length of the common run ending at a[i - 1], b[j]
    let mut prev = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let k = prev[j] + 1;
                cur[j + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = cur;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(close(ratio("delhi", "delhi"), 1.0));
        assert!(close(ratio("", ""), 1.0));
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(close(ratio("abc", "xyz"), 0.0));
        assert!(close(ratio("abc", ""), 0.0));
    }

    #[test]
    fn transposition_scores_high() {
        // "de" + "h" + "i" match: 2 * 4 / 10
        assert!(close(ratio("dehli", "delhi"), 0.8));
    }

    #[test]
    fn is_symmetric_for_simple_cases() {
        assert!(close(ratio("pune", "poona"), ratio("poona", "pune")));
    }

    #[test]
    fn order_matters_when_blocks_tie() {
        // after "na", single-char ties go to 'g' with "nagpur" first but to
        // the trailing 'r' with "nargupr" first, which blocks the rest
        assert!(close(ratio("nagpur", "nargupr"), 10.0 / 13.0));
        assert!(close(ratio("nargupr", "nagpur"), 6.0 / 13.0));
    }

    #[test]
    fn known_reference_value() {
        // Classic example: "abcd" vs "bcde" share "bcd"
        assert!(close(ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn unrelated_city_scores_low() {
        assert!(ratio("dehli", "mumbai") < 0.6);
        assert!(ratio("dehli", "chennai") < 0.6);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 'é' is two bytes in UTF-8 but one char
        assert!(close(ratio("é", "é"), 1.0));
        assert!(close(ratio("aé", "a"), 2.0 / 3.0));
    }
}
