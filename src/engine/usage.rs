/// Estimate the number of tokens in `text`.
///
/// Uses a lightweight heuristic (`bytes / 4`, rounded up). Deterministic, so
/// the same text always yields the same count.
#[must_use]
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}
