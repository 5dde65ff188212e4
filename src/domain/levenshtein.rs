//! src/domain/levenshtein.rs

/// Levenshtein distance between `a` and `b`, counted in `char`s.
///
/// Insertions, deletions and substitutions all cost 1. No case folding is
/// done here; callers lower-case both operands first.
pub fn distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    // Single rolling row: `row[j]` holds the distance between the prefix of `a`
    // processed so far and the first `j` chars of `b`.
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let insert_cost = row[j] + 1;
            let delete_cost = row[j + 1] + 1;
            let replace_cost = diagonal + usize::from(ca != *cb);

            diagonal = row[j + 1];
            row[j + 1] = insert_cost.min(delete_cost).min(replace_cost);
        }
    }

    row[b.len()]
}
