/// Counts the leading words of `reference` that `typed` reproduces exactly.
///
/// Both texts are split on single spaces only, so runs of spaces yield empty
/// words that have to line up as well. Counting stops at the first mismatch or
/// when either side runs out of words.
pub fn score_typed(reference: &str, typed: &str) -> usize {
    reference
        .split(' ')
        .zip(typed.split(' '))
        .take_while(|(expected, actual)| expected == actual)
        .count()
}
