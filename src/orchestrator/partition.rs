use std::ops::Range;

use crate::error::{GeneticError, Result};

/// Splits `range` into `parts` contiguous chunks that cover it exactly once.
///
/// Every chunk gets `len / parts` indices and the last one also absorbs the
/// remainder, so with more parts than indices all but the last chunk are empty.
///
/// ```rust
/// use flapgen::orchestrator::partition::partition;
///
/// let chunks = partition(20..100, 3).unwrap();
/// assert_eq!(chunks, vec![20..46, 46..72, 72..100]);
/// ```
///
/// # Errors
///
/// Returns `GeneticError::Configuration` when `parts` is zero.
pub fn partition(range: Range<usize>, parts: usize) -> Result<Vec<Range<usize>>> {
    if parts == 0 {
        return Err(GeneticError::Configuration(
            "Cannot partition work across zero workers".to_string(),
        ));
    }

    let start = range.start;
    let end = range.end.max(start);
    let chunk = (end - start) / parts;

    Ok((0..parts)
        .map(|part| {
            let from = start + part * chunk;
            let to = if part + 1 == parts { end } else { from + chunk };
            from..to
        })
        .collect())
}
