//! Per-frame column cursors.

use std::ops::RangeInclusive;

use trackscheme_core::identifier::Frame;

/// First column handed out on every row. Column 0 stays empty.
pub const START_COLUMN: usize = 1;

/// Next free column of every frame, local to one layout pass.
///
/// Cursors only ever move right: every mutation either adds to a cursor or
/// raises it to a larger value.
#[derive(Debug, Clone)]
pub(crate) struct ColumnCursors {
    columns: Vec<usize>,
}

impl ColumnCursors {
    /// Creates cursors for frames `0..frames`, all at [`START_COLUMN`].
    pub(crate) fn new(frames: usize) -> Self {
        Self {
            columns: vec![START_COLUMN; frames],
        }
    }

    pub(crate) fn get(&self, frame: Frame) -> usize {
        self.columns[frame]
    }

    /// Moves the cursor of `frame` right by `columns`.
    pub(crate) fn advance(&mut self, frame: Frame, columns: usize) {
        self.columns[frame] += columns;
    }

    /// Returns the cursor of `frame` and moves it right by one.
    pub(crate) fn take(&mut self, frame: Frame) -> usize {
        let column = self.columns[frame];
        self.columns[frame] += 1;
        column
    }

    /// Raises every cursor to at least `column`.
    pub(crate) fn raise_all(&mut self, column: usize) {
        for cursor in &mut self.columns {
            *cursor = (*cursor).max(column);
        }
    }

    /// Raises the cursors of `span` to at least `column`.
    pub(crate) fn raise_span(&mut self, span: RangeInclusive<Frame>, column: usize) {
        for cursor in &mut self.columns[span] {
            *cursor = (*cursor).max(column);
        }
    }

    /// Largest cursor over `span`.
    pub(crate) fn max_over(&self, span: RangeInclusive<Frame>) -> usize {
        self.columns[span]
            .iter()
            .copied()
            .max()
            .unwrap_or(START_COLUMN)
    }

    /// Largest cursor over all frames.
    pub(crate) fn max(&self) -> usize {
        self.columns.iter().copied().max().unwrap_or(START_COLUMN)
    }

    /// Moves every cursor past the widest row, leaving one empty column, and
    /// returns the widest row's cursor.
    pub(crate) fn open_band(&mut self) -> usize {
        let max = self.max();
        self.columns.fill(max + 1);
        max
    }
}
