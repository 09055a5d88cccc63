//! Bounded per-day note buffer.

/// A fixed-capacity ordered list of example notes.
///
/// Ordinary notes are appended until the buffer is full; later notes are
/// dropped. A note can also be pinned to the front, evicting the last
/// note when the buffer is full. Pinning never duplicates a note already
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBuffer {
    capacity: usize,
    notes: Vec<String>,
}

impl NoteBuffer {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            notes: Vec::new(),
        }
    }

    /// Appends a note. Returns `false` (and drops the note) when full.
    pub fn push(&mut self, note: impl Into<String>) -> bool {
        if self.notes.len() >= self.capacity {
            return false;
        }
        self.notes.push(note.into());
        true
    }

    /// Inserts a note at the front, evicting the last note if the buffer
    /// is full. A note already present is left where it is.
    pub fn pin_front(&mut self, note: &str) {
        if self.notes.iter().any(|existing| existing == note) {
            return;
        }
        if self.notes.len() >= self.capacity {
            self.notes.pop();
        }
        if self.capacity > 0 {
            self.notes.insert(0, note.to_string());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.notes
    }

    #[must_use]
    pub fn into_notes(self) -> Vec<String> {
        self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_stops_at_capacity() {
        let mut buffer = NoteBuffer::new(3);
        assert!(buffer.push("a"));
        assert!(buffer.push("b"));
        assert!(buffer.push("c"));
        assert!(!buffer.push("d"));
        assert_eq!(buffer.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn pin_front_inserts_when_not_full() {
        let mut buffer = NoteBuffer::new(3);
        buffer.push("a");
        buffer.pin_front("pinned");
        assert_eq!(buffer.as_slice(), ["pinned", "a"]);
    }

    #[test]
    fn pin_front_evicts_last_when_full() {
        let mut buffer = NoteBuffer::new(3);
        buffer.push("a");
        buffer.push("b");
        buffer.push("c");
        buffer.pin_front("pinned");
        assert_eq!(buffer.as_slice(), ["pinned", "a", "b"]);
    }

    #[test]
    fn pin_front_never_duplicates() {
        let mut buffer = NoteBuffer::new(3);
        buffer.push("a");
        buffer.pin_front("pinned");
        buffer.pin_front("pinned");
        assert_eq!(buffer.as_slice(), ["pinned", "a"]);
    }

    #[test]
    fn zero_capacity_ignores_everything() {
        let mut buffer = NoteBuffer::new(0);
        assert!(!buffer.push("a"));
        buffer.pin_front("pinned");
        assert!(buffer.is_empty());
    }
}
