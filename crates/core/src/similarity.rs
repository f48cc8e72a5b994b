use std::sync::LazyLock;

use regex::Regex;

static HEX_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]+$").expect("hex token pattern is valid"));

static HTTP_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(GET|HEAD|PUT|POST)$").expect("http method pattern is valid")
});

/// Score in `0.0..=1.0` describing how alike two tokenized lines are.
///
/// The first token is assumed to be a timestamp and is never compared. Short
/// lines (fewer than three tokens) are judged on their last token alone, with
/// same-width hex values and HTTP methods treated as the same shape. Longer
/// lines are aligned from the tail so that a shared run of trailing fields
/// still scores high when the message prefix changes length.
pub fn line_similarity<A: AsRef<str>, B: AsRef<str>>(prev: &[A], cur: &[B]) -> f64 {
    let total = cur.len();
    if total == 0 {
        return 0.0;
    }

    if total < 3 {
        let (Some(a), Some(b)) = (prev.last(), cur.last()) else {
            return 0.0;
        };
        return token_similarity(a.as_ref(), b.as_ref());
    }

    let compare = total - 1;
    let mut same = 0usize;
    for (a, b) in prev.iter().rev().zip(cur.iter().rev()).take(compare) {
        if a.as_ref() == b.as_ref() {
            same += 1;
        }
    }
    same as f64 / compare as f64
}

fn token_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == b_len && HEX_VALUE.is_match(a) && HEX_VALUE.is_match(b) {
        return 0.9;
    }
    if HTTP_METHOD.is_match(a) && HTTP_METHOD.is_match(b) {
        return 0.9;
    }

    let longest = a_len.max(b_len);
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Levenshtein distance over Unicode scalar values.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev_row[j] + cost)
                .min(prev_row[j + 1] + 1)
                .min(row[j] + 1);
        }
        std::mem::swap(&mut prev_row, &mut row);
    }
    prev_row[b.len()]
}
