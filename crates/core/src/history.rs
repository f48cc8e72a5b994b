use crate::tokenize::Line;

/// Fixed-capacity ring of the most recent lines.
///
/// Slots are reused once the ring is full; callers must flush a line before
/// the slot holding it is overwritten. At least two slots are kept: a
/// single-line block that breaks before its first cycle leaves two lines
/// pending.
#[derive(Debug)]
pub(crate) struct HistoryRing {
    slots: Vec<Line>,
    capacity: usize,
    next: usize,
}

impl HistoryRing {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn push(&mut self, line: Line) {
        if self.slots.len() < self.capacity {
            self.slots.push(line);
        } else {
            self.slots[self.next] = line;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    /// `back(0)` is the most recent line.
    pub(crate) fn back(&self, offset: usize) -> Option<&Line> {
        if offset >= self.slots.len() {
            return None;
        }
        let idx = (self.next + self.capacity - 1 - offset) % self.capacity;
        self.slots.get(idx)
    }

    /// The `count` most recent lines, oldest first.
    pub(crate) fn recent(&self, count: usize) -> impl Iterator<Item = &Line> {
        let count = count.min(self.slots.len());
        (0..count).rev().filter_map(move |offset| self.back(offset))
    }
}
