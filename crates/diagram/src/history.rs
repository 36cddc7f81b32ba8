//! Linear snapshot history with undo/redo.
//!
//! The history keeps every committed state as a whole value. Undo and redo
//! move a pointer over that list and restore the entry exactly. Besides the
//! committed entries there is a *live* value: a `Commit::Preview` replaces it
//! without creating an entry, so a run of high-frequency updates (a drag, a
//! color-picker gesture) can be shown immediately and later sealed into a
//! single undo step by one `Commit::Record`.

/// How a new value enters the history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Commit {
    /// Push a new undoable entry.
    #[default]
    Record,
    /// Replace the live value only.
    Preview,
}

#[derive(Clone, Debug)]
pub struct History<T> {
    entries: Vec<T>,
    pointer: usize,
    live: T,
    previewing: bool,
    version: u64,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial.clone()],
            pointer: 0,
            live: initial,
            previewing: false,
            version: 0,
        }
    }

    /// The current state, including any pending preview.
    pub fn present(&self) -> &T {
        &self.live
    }

    /// The entry under the pointer, ignoring any pending preview.
    pub fn committed(&self) -> &T {
        &self.entries[self.pointer]
    }

    pub fn commit(&mut self, next: T, mode: Commit) {
        match mode {
            Commit::Record => {
                self.entries.truncate(self.pointer + 1);
                self.entries.push(next.clone());
                self.pointer += 1;
                self.previewing = false;
            }
            Commit::Preview => {
                self.previewing = true;
            }
        }
        self.live = next;
        self.bump();
    }

    /// Steps back one entry. Does nothing at the oldest entry.
    pub fn undo(&mut self) {
        if !self.can_undo() {
            return;
        }
        self.pointer -= 1;
        self.restore();
    }

    /// Steps forward one entry. Does nothing at the newest entry.
    pub fn redo(&mut self) {
        if !self.can_redo() {
            return;
        }
        self.pointer += 1;
        self.restore();
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// True while the live value runs ahead of the committed entry.
    pub fn is_previewing(&self) -> bool {
        self.previewing
    }

    /// Drops a pending preview, returning to the committed entry.
    pub fn discard_preview(&mut self) {
        if self.previewing {
            self.restore();
        }
    }

    /// Number of committed entries; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Counter bumped on every change of the live value.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn restore(&mut self) {
        self.live = self.entries[self.pointer].clone();
        self.previewing = false;
        self.bump();
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
