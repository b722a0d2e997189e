use std::collections::BTreeMap;
use thiserror::Error;

/// Result sequencer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("Result index {index} is out of range for {len} targets")]
    OutOfRange { index: usize, len: usize },

    #[error("Result for index {0} was already recorded")]
    Duplicate(usize),
}

/// Re-orders results that complete in any order back into input order.
///
/// Results are released as a contiguous prefix: a result at index `i` becomes
/// available once every result before it has been pushed.
#[derive(Debug)]
pub struct ResultSequencer<T> {
    len: usize,
    pending: BTreeMap<usize, T>,
    released: Vec<T>,
}

impl<T> ResultSequencer<T> {
    /// Sequencer expecting exactly `len` results
    pub fn new(len: usize) -> Self {
        Self {
            len,
            pending: BTreeMap::new(),
            released: Vec::with_capacity(len),
        }
    }

    /// Record the result for `index` and return the results it released
    pub fn push(&mut self, index: usize, result: T) -> Result<&[T], SequencerError> {
        if index >= self.len {
            return Err(SequencerError::OutOfRange {
                index,
                len: self.len,
            });
        }
        if index < self.released.len() || self.pending.contains_key(&index) {
            return Err(SequencerError::Duplicate(index));
        }

        let start = self.released.len();
        self.pending.insert(index, result);
        while let Some(next) = self.pending.remove(&self.released.len()) {
            self.released.push(next);
        }
        Ok(&self.released[start..])
    }

    /// Number of results released so far
    pub fn released_count(&self) -> usize {
        self.released.len()
    }

    /// Whether every expected result has been released
    pub fn is_complete(&self) -> bool {
        self.released.len() == self.len
    }

    /// Released results in input order
    pub fn into_results(self) -> Vec<T> {
        self.released
    }
}
