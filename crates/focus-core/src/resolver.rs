/// Snaps a requested window length to the nearest length the matcher
/// actually supports.
///
/// On an exact tie the entry appearing earlier in the supported set's
/// canonical order wins. The requested length is still what gets reported in
/// pack metadata; resolution never leaks into the external contract.
pub fn resolve_window_len(requested: usize, supported: &[usize]) -> usize {
    let mut best = supported.first().copied().unwrap_or(requested);
    let mut best_diff = best.abs_diff(requested);
    for &candidate in supported.iter().skip(1) {
        let diff = candidate.abs_diff(requested);
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}
