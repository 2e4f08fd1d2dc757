#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    LowerBound, // Beta cutoff (fail-high)
    UpperBound, // Never raised alpha (fail-low)
}

#[derive(Clone, Debug)]
pub struct TTEntry<M> {
    pub key: u64,
    pub best_move: Option<M>,
    pub score: i32,
    pub depth: u8,
    pub flag: TTFlag,
    generation: u8,
}

/// Fixed-capacity position cache indexed by the low bits of the hash.
///
/// Replacement is depth-preferred with aging: a slot is overwritten when it
/// is empty, holds the same position, was written by an earlier search, or
/// holds a result at most as deep as the new one.
pub struct TranspositionTable<M> {
    entries: Vec<Option<TTEntry<M>>>,
    mask: usize,
    generation: u8,
}

impl<M: Clone> TranspositionTable<M> {
    const MIN_ENTRIES: usize = 1024;

    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry<M>>>().max(1);
        let num_entries = (size_mb * 1024 * 1024) / entry_size;
        Self::with_entries(num_entries)
    }

    /// Capacity is rounded down to a power of two.
    pub fn with_entries(num_entries: usize) -> Self {
        let mut size = 1;
        while size <= num_entries {
            size *= 2;
        }
        size /= 2; // Keep it within the requested budget
        let size = size.max(Self::MIN_ENTRIES);

        Self {
            entries: vec![None; size],
            mask: size - 1,
            generation: 0,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn slot(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    pub fn probe(&self, key: u64) -> Option<&TTEntry<M>> {
        self.entries
            .get(self.slot(key))
            .and_then(Option::as_ref)
            .filter(|entry| entry.key == key)
    }

    pub fn get_move(&self, key: u64) -> Option<M> {
        self.probe(key).and_then(|e| e.best_move.clone())
    }

    pub fn store(&mut self, key: u64, best_move: Option<M>, score: i32, depth: u8, flag: TTFlag) {
        let idx = self.slot(key);
        let generation = self.generation;
        let Some(slot) = self.entries.get_mut(idx) else {
            return;
        };

        let replace = match slot {
            None => true,
            Some(old) => {
                old.key == key || old.generation != generation || depth >= old.depth
            }
        };
        if !replace {
            return;
        }

        // Keep the previous best move when re-storing a position without one.
        let best_move = match (best_move, slot.as_ref()) {
            (None, Some(old)) if old.key == key => old.best_move.clone(),
            (mv, _) => mv,
        };

        *slot = Some(TTEntry {
            key,
            best_move,
            score,
            depth,
            flag,
            generation,
        });
    }

    /// Marks every existing entry as belonging to an earlier search.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
        self.generation = 0;
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Occupied slots per thousand, sampled from the first thousand slots.
    pub fn hashfull(&self) -> usize {
        let sample = self.entries.len().min(1000);
        let used = self
            .entries
            .iter()
            .take(sample)
            .filter(|e| e.is_some())
            .count();
        used * 1000 / sample.max(1)
    }
}
