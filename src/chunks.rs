//! Fixed-size batching of a row source
use std::num::NonZeroUsize;

use crate::error::{OverlapError, Result};

/// Pulls at most `size` items from the inner iterator per call to `next`.
/// Only one chunk is buffered at a time. The last chunk may be short and an
/// empty chunk is never yielded; the source is consumed, so starting over
/// means building a new `Chunks` over a reopened source.
///
/// Example:
///
/// ```
/// # use lncoverlap::chunks::Chunks;
/// let sizes: Vec<usize> = Chunks::new(0..25, 10)?.map(|c| c.len()).collect();
/// // [10, 10, 5]
/// # Ok::<(), lncoverlap::error::OverlapError>(())
/// ```
pub struct Chunks<I: Iterator> {
    inner: I,
    size: NonZeroUsize,
}

impl<I: Iterator> Chunks<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(source: T, size: usize) -> Result<Self> {
        let size = NonZeroUsize::new(size).ok_or(OverlapError::InvalidChunkSize(size))?;
        Ok(Self {
            inner: source.into_iter(),
            size,
        })
    }
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk: Vec<I::Item> = self.inner.by_ref().take(self.size.get()).collect();
        if chunk.is_empty() {
            return None;
        }
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(100)]
    #[case(1000)]
    fn test_concat_reproduces_source(#[case] size: usize) {
        let rows: Vec<String> = (0..100).map(|i| format!("row{i}")).collect();
        let chunks: Vec<Vec<String>> = Chunks::new(rows.clone(), size).unwrap().collect();
        assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
        assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == size));
        let flat: Vec<String> = chunks.into_iter().flatten().collect();
        assert_eq!(flat, rows);
    }

    #[rstest]
    fn test_short_tail() {
        let sizes: Vec<usize> = Chunks::new(0..25, 10).unwrap().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[rstest]
    fn test_empty_source() {
        assert_eq!(Chunks::new(Vec::<u8>::new(), 3).unwrap().count(), 0);
    }

    #[rstest]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Chunks::new(0..3, 0),
            Err(OverlapError::InvalidChunkSize(0))
        ));
    }
}
