use crate::error::{LoaderError, Result};
use std::ops::Range;

/// Split `[0, total_rows)` into consecutive ranges of at most `batch_size` rows.
///
/// The count is `ceil(total_rows / batch_size)`, so a total that is an exact
/// multiple of the batch size never yields a trailing empty batch, and an
/// empty source yields no batches at all.
pub fn plan_batches(total_rows: usize, batch_size: usize) -> Result<Vec<Range<usize>>> {
    if batch_size == 0 {
        return Err(LoaderError::Config("batch size must be at least 1".to_string()));
    }
    Ok((0..total_rows)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(total_rows))
        .collect())
}
