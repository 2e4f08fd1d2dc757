#![allow(clippy::indexing_slicing)]

use crate::engine::config::EngineConfig;
use crate::engine::{Evaluator, MAX_PLY};
use crate::logic::game::Game;

/// Killer moves per ply and history scores per move index, scoped to one
/// search invocation.
pub struct MoveOrderer<M> {
    killer_moves: Vec<[Option<M>; 2]>,
    history_table: Vec<i32>,
}

impl<M: Clone + PartialEq> MoveOrderer<M> {
    pub fn new(index_space: usize) -> Self {
        Self {
            killer_moves: vec![[None, None]; MAX_PLY],
            history_table: vec![0; index_space],
        }
    }

    pub fn clear(&mut self) {
        for killers in &mut self.killer_moves {
            *killers = [None, None];
        }
        for score in &mut self.history_table {
            *score = 0;
        }
    }

    /// Sorts `moves` best-first. Never drops a move; ties keep generation order.
    #[allow(clippy::too_many_arguments)]
    pub fn order<G: Game<Move = M>>(
        &self,
        game: &G,
        evaluator: &G::Eval,
        config: &EngineConfig,
        board: &G::Board,
        moves: Vec<M>,
        ply: usize,
        hash_move: Option<&M>,
    ) -> Vec<M> {
        let mut scored: Vec<(i32, M)> = moves
            .into_iter()
            .map(|mv| {
                let score = self.score_move(game, evaluator, config, board, &mv, ply, hash_move);
                (score, mv)
            })
            .collect();

        // `sort_by` is stable.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, mv)| mv).collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn score_move<G: Game<Move = M>>(
        &self,
        game: &G,
        evaluator: &G::Eval,
        config: &EngineConfig,
        board: &G::Board,
        mv: &M,
        ply: usize,
        hash_move: Option<&M>,
    ) -> i32 {
        let features = evaluator.move_features(board, mv);
        let mut score = features.positional_delta;

        if hash_move.is_some_and(|hm| hm == mv) {
            score += config.score_hash_move;
        }
        if features.is_capture() {
            score += config.score_capture_base
                + features.capture_value * config.score_capture_multiplier;
        }
        if features.promotion {
            score += config.score_promotion;
        }
        match self.killer_slot(mv, ply) {
            Some(0) => score += config.score_killer_move,
            Some(_) => score += config.score_killer_move - config.score_killer_move / 10,
            None => {}
        }
        let history = self.history_score(game.move_index(mv)) / config.history_divisor;
        score += history.min(config.score_history_max);

        score
    }

    pub fn killer_slot(&self, mv: &M, ply: usize) -> Option<usize> {
        self.killer_moves
            .get(ply)?
            .iter()
            .position(|k| k.as_ref() == Some(mv))
    }

    pub fn history_score(&self, index: usize) -> i32 {
        self.history_table.get(index).copied().unwrap_or(0)
    }

    /// Records a quiet move that caused a beta cutoff.
    pub fn record_cutoff(&mut self, mv: &M, index: usize, ply: usize, depth: u8) {
        if let Some(killers) = self.killer_moves.get_mut(ply) {
            // Shift: 0 -> 1, New -> 0
            if killers[0].as_ref() != Some(mv) {
                killers[1] = killers[0].take();
                killers[0] = Some(mv.clone());
            }
        }
        if let Some(score) = self.history_table.get_mut(index) {
            *score = score.saturating_add(i32::from(depth) * i32::from(depth));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_killers_shift() {
        let mut orderer: MoveOrderer<u8> = MoveOrderer::new(16);
        orderer.record_cutoff(&1, 1, 3, 2);
        orderer.record_cutoff(&2, 2, 3, 2);
        assert_eq!(orderer.killer_slot(&2, 3), Some(0));
        assert_eq!(orderer.killer_slot(&1, 3), Some(1));
        assert_eq!(orderer.killer_slot(&1, 4), None);

        // Re-recording the top killer does not evict the second one.
        orderer.record_cutoff(&2, 2, 3, 2);
        assert_eq!(orderer.killer_slot(&1, 3), Some(1));
    }

    #[test]
    fn test_history_grows_with_depth_squared() {
        let mut orderer: MoveOrderer<u8> = MoveOrderer::new(16);
        orderer.record_cutoff(&5, 5, 0, 3);
        orderer.record_cutoff(&5, 5, 1, 2);
        assert_eq!(orderer.history_score(5), 13);
        orderer.clear();
        assert_eq!(orderer.history_score(5), 0);
        assert_eq!(orderer.killer_slot(&5, 0), None);
    }
}
