//! Growable container of units with offset translation.

use crate::error::{Error, Result};
use crate::text::unit::{Unit, segment, slice_chars};
use std::ops::Range;

/// Rounding direction when an external offset falls inside an atomic unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Bias {
    /// Round to the start of the unit.
    #[default]
    Left,
    /// Round to the end of the unit.
    Right,
}

/// Ordered sequence of [`Unit`]s with cached internal/external lengths.
///
/// Per-unit start offsets are cached alongside the units, so translating an
/// offset is a binary search. `append` extends the caches in O(1); `insert`
/// and `remove` rebuild them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitBuffer {
    units: Vec<Unit>,
    /// Internal start offset of each unit.
    starts: Vec<usize>,
    /// External start offset of each unit.
    external_starts: Vec<usize>,
    internal_len: usize,
    external_len: usize,
}

/// A borrowed sub-range of one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSlice<'a> {
    /// The unit being sliced.
    pub unit: &'a Unit,
    /// Internal range relative to the unit start.
    pub range: (usize, usize),
    /// Absolute internal offset of the slice start within the buffer.
    pub offset: usize,
}

impl<'a> UnitSlice<'a> {
    /// Whether the slice covers the whole unit.
    #[must_use]
    pub fn is_whole(&self) -> bool {
        self.range.0 == 0 && self.range.1 == self.unit.internal_len()
    }

    /// Visible text of the slice.
    #[must_use]
    pub fn external_text(&self) -> std::borrow::Cow<'a, str> {
        match self.unit {
            Unit::Text(text) => std::borrow::Cow::Borrowed(slice_chars(text, self.range.0, self.range.1)),
            _ => self.unit.external_text(),
        }
    }

    /// Internal length of the slice.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.range.1 - self.range.0
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.range.1 == self.range.0
    }
}

impl UnitBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` units.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            units: Vec::with_capacity(capacity),
            starts: Vec::with_capacity(capacity),
            external_starts: Vec::with_capacity(capacity),
            internal_len: 0,
            external_len: 0,
        }
    }

    /// Create a buffer by segmenting text into units.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_units(segment(text))
    }

    /// Create a buffer from units. Empty text units are skipped.
    #[must_use]
    pub fn from_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut buffer = Self::new();
        for unit in units {
            buffer.append(unit);
        }
        buffer
    }

    /// Append a unit, returning the internal range it now occupies.
    pub fn append(&mut self, unit: Unit) -> Range<usize> {
        let start = self.internal_len;
        let internal = unit.internal_len();
        if internal == 0 {
            return start..start;
        }
        self.starts.push(start);
        self.external_starts.push(self.external_len);
        self.internal_len += internal;
        self.external_len += unit.external_len();
        self.units.push(unit);
        start..self.internal_len
    }

    /// Segment text and append the resulting units.
    pub fn append_text(&mut self, text: &str) -> Range<usize> {
        let start = self.internal_len;
        for unit in segment(text) {
            self.append(unit);
        }
        start..self.internal_len
    }

    /// Insert a unit at an internal offset.
    ///
    /// An offset strictly inside a text unit splits that unit around the new
    /// one; an offset on a unit boundary inserts between the neighbours;
    /// `offset == len()` appends.
    pub fn insert(&mut self, unit: Unit, offset: usize) -> Result<()> {
        if offset > self.internal_len {
            return Err(Error::InvalidOffset {
                offset,
                len: self.internal_len,
            });
        }
        if offset == self.internal_len {
            self.append(unit);
            return Ok(());
        }
        if unit.internal_len() == 0 {
            return Ok(());
        }

        let (idx, local) = self.locate(offset);
        if local == 0 {
            self.units.insert(idx, unit);
        } else {
            let (before, after) = self.units[idx].split_at(local);
            let replacement = before.into_iter().chain(Some(unit)).chain(after);
            self.units.splice(idx..=idx, replacement);
        }
        self.rebuild_index();
        Ok(())
    }

    /// Remove the internal range `[start, end)`, returning the removed units.
    ///
    /// Text units on the boundaries are split so exactly the requested range
    /// disappears. Atomic units occupy a single slot, so internal boundaries
    /// never fall inside one.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<Vec<Unit>> {
        if end > self.internal_len {
            return Err(Error::InvalidOffset {
                offset: end,
                len: self.internal_len,
            });
        }
        if start > end {
            return Err(Error::InvalidOffset {
                offset: start,
                len: end,
            });
        }
        if start == end {
            return Ok(Vec::new());
        }

        let first = self.split_boundary(start);
        let last = self.split_boundary(end);
        let removed: Vec<Unit> = self.units.drain(first..last).collect();
        self.rebuild_index();
        Ok(removed)
    }

    /// Ensure a unit boundary at `offset`; returns the index of the first
    /// unit starting at or after it.
    fn split_boundary(&mut self, offset: usize) -> usize {
        if offset == self.internal_len {
            return self.units.len();
        }
        let (idx, local) = self.locate(offset);
        if local == 0 {
            return idx;
        }
        let (before, after) = self.units[idx].split_at(local);
        let parts: Vec<Unit> = before.into_iter().chain(after).collect();
        self.units.splice(idx..=idx, parts);
        self.rebuild_index();
        idx + 1
    }

    fn rebuild_index(&mut self) {
        self.starts.clear();
        self.external_starts.clear();
        let mut internal = 0;
        let mut external = 0;
        for unit in &self.units {
            self.starts.push(internal);
            self.external_starts.push(external);
            internal += unit.internal_len();
            external += unit.external_len();
        }
        self.internal_len = internal;
        self.external_len = external;
    }

    /// Unit index containing an internal offset, and the offset within it.
    ///
    /// For `offset == len()` returns `(unit_count, 0)`.
    #[must_use]
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        if offset >= self.internal_len {
            return (self.units.len(), offset - self.internal_len);
        }
        let idx = self.starts.partition_point(|&start| start <= offset) - 1;
        (idx, offset - self.starts[idx])
    }

    /// Translate an internal offset to an external offset.
    ///
    /// Offsets past the end clamp to the external length.
    #[must_use]
    pub fn internal_to_external(&self, offset: usize) -> usize {
        if offset >= self.internal_len {
            return self.external_len;
        }
        let (idx, local) = self.locate(offset);
        // Atomic units only have local offset 0 here.
        self.external_starts[idx] + local
    }

    /// Translate an external offset to an internal offset.
    ///
    /// Offsets strictly inside an atomic unit are rounded according to `bias`.
    /// Offsets past the end clamp to the internal length.
    #[must_use]
    pub fn external_to_internal(&self, offset: usize, bias: Bias) -> usize {
        if offset >= self.external_len {
            return self.internal_len;
        }
        let idx = self
            .external_starts
            .partition_point(|&start| start <= offset)
            - 1;
        let local = offset - self.external_starts[idx];
        match &self.units[idx] {
            Unit::Text(_) => self.starts[idx] + local,
            _ if local == 0 => self.starts[idx],
            _ => match bias {
                Bias::Left => self.starts[idx],
                Bias::Right => self.starts[idx] + 1,
            },
        }
    }

    /// Iterate over the unit slices covering an internal range.
    #[must_use]
    pub fn slices(&self, range: Range<usize>) -> UnitSlices<'_> {
        let end = range.end.min(self.internal_len);
        let start = range.start.min(end);
        let (idx, _) = self.locate(start);
        UnitSlices {
            buffer: self,
            idx,
            pos: start,
            end,
        }
    }

    /// External length of an internal range.
    #[must_use]
    pub fn external_len_of(&self, range: Range<usize>) -> usize {
        self.internal_to_external(range.end) - self.internal_to_external(range.start)
    }

    /// Visible text of an internal range.
    #[must_use]
    pub fn external_text_of(&self, range: Range<usize>) -> String {
        self.slices(range)
            .map(|slice| slice.external_text())
            .collect()
    }

    /// Storage text of an internal range.
    #[must_use]
    pub fn internal_text_of(&self, range: Range<usize>) -> String {
        self.slices(range)
            .map(|slice| match slice.unit {
                Unit::Text(_) => slice.external_text(),
                unit => unit.internal_text(),
            })
            .collect()
    }

    /// Full visible text.
    #[must_use]
    pub fn text(&self) -> String {
        self.units.iter().map(Unit::external_text).collect()
    }

    /// Full storage text.
    #[must_use]
    pub fn internal_text(&self) -> String {
        self.units.iter().map(Unit::internal_text).collect()
    }

    /// The units in order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Total internal length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.internal_len
    }

    /// Total external length.
    #[must_use]
    pub const fn external_len(&self) -> usize {
        self.external_len
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.internal_len == 0
    }
}

/// Iterator over [`UnitSlice`]s of a buffer range. See [`UnitBuffer::slices`].
#[derive(Clone, Debug)]
pub struct UnitSlices<'a> {
    buffer: &'a UnitBuffer,
    idx: usize,
    pos: usize,
    end: usize,
}

impl<'a> Iterator for UnitSlices<'a> {
    type Item = UnitSlice<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let unit = self.buffer.units.get(self.idx)?;
        let unit_start = self.buffer.starts[self.idx];
        let local_start = self.pos - unit_start;
        let local_end = unit.internal_len().min(self.end - unit_start);
        let slice = UnitSlice {
            unit,
            range: (local_start, local_end),
            offset: self.pos,
        };
        self.pos = unit_start + local_end;
        self.idx += 1;
        Some(slice)
    }
}
