use crate::foundation::error::EmojifyResult;

/// Largest `size` in `[lo, hi]` for which `fits(size)` holds, assuming `fits` is monotone
/// (true up to some threshold, false after it).
///
/// Returns `lo` when nothing in the range fits. Probe errors abort the search.
pub fn largest_fitting(
    lo: u32,
    hi: u32,
    mut fits: impl FnMut(u32) -> EmojifyResult<bool>,
) -> EmojifyResult<u32> {
    let mut low = lo;
    let mut high = hi;
    let mut best = lo;

    while low <= high {
        let mid = low + (high - low) / 2;
        if fits(mid)? {
            best = mid;
            low = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            high = mid - 1;
        }
    }

    Ok(best)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/search.rs"]
mod tests;
