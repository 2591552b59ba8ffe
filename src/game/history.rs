use super::state::Position;

/// Fixed-capacity ring buffer of recent head positions.
///
/// Used to spot the snake looping back onto cells it visited a few ticks ago.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionHistory {
    slots: Vec<Position>,
    capacity: usize,
    /// Index of the oldest entry once the buffer is full
    start: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            start: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.start = 0;
    }

    /// Append a position, evicting the oldest one when full.
    ///
    /// Returns the evicted position, if any.
    pub fn push(&mut self, pos: Position) -> Option<Position> {
        if self.capacity == 0 {
            return Some(pos);
        }
        if !self.is_full() {
            self.slots.push(pos);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.start], pos);
        self.start = (self.start + 1) % self.capacity;
        Some(evicted)
    }

    /// Record the head and report whether it closes a loop.
    ///
    /// A loop is only reported once the window has overflowed, and only when
    /// the head matches one of the entries other than the one just pushed.
    pub fn record_and_check_loop(&mut self, head: Position) -> bool {
        if self.push(head).is_none() {
            return false;
        }
        self.iter().take(self.len().saturating_sub(1)).any(|p| p == head)
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let (newer, older) = self.slots.split_at(self.start);
        older.iter().chain(newer.iter()).copied()
    }
}
