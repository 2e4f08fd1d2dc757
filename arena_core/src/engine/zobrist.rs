use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random keys for incremental position hashing: one key per
/// (piece kind, cell) pair plus a side-to-move key.
///
/// Keys come from a fixed seed so hashes are stable across runs.
pub struct ZobristKeys {
    piece_keys: Vec<u64>,
    cells: usize,
    side_key: u64,
}

impl ZobristKeys {
    pub fn new(piece_kinds: usize, cells: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let piece_keys = (0..piece_kinds * cells).map(|_| rng.gen()).collect();
        let side_key = rng.gen();

        Self {
            piece_keys,
            cells,
            side_key,
        }
    }

    /// Key for `kind` standing on `cell`. Both indices are produced by the
    /// owning board, so they are always in range.
    pub fn piece_key(&self, kind: usize, cell: usize) -> u64 {
        let idx = kind * self.cells + cell;
        self.piece_keys.get(idx).copied().unwrap_or_else(|| {
            panic!("zobrist index out of range: kind {kind}, cell {cell}")
        })
    }

    pub const fn side_key(&self) -> u64 {
        self.side_key
    }
}
