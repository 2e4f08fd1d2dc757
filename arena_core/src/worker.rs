//! Background move computation. A search runs on its own thread and hands
//! back exactly one result through a single-slot channel, so a UI loop can
//! poll for it without blocking.

use crate::engine::config::EngineConfig;
use crate::engine::difficulty::{AiPlayer, Difficulty};
use crate::engine::SearchStats;
use crate::logic::board::Side;
use crate::logic::game::Game;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{debug, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
pub enum Output<M> {
    MoveFound(M, SearchStats),
    /// The side to move had nothing to play.
    NoMove,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("search thread exited without a result")]
    Disconnected,
}

/// Handle to a search running in the background.
pub struct PendingMove<M> {
    rx: Receiver<Output<M>>,
    cancel: Arc<AtomicBool>,
}

impl<M> PendingMove<M> {
    /// Asks the search to stop. It still answers with the best move of the
    /// deepest finished iteration.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// `Ok(None)` while the search is still running.
    pub fn try_recv(&self) -> Result<Option<Output<M>>, WorkerError> {
        match self.rx.try_recv() {
            Ok(output) => Ok(Some(output)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    pub fn wait(self) -> Result<Output<M>, WorkerError> {
        self.rx.recv().map_err(|_| WorkerError::Disconnected)
    }
}

pub struct SearchWorker;

impl SearchWorker {
    pub fn spawn<G>(
        game: G,
        board: G::Board,
        side: Side,
        difficulty: Difficulty,
    ) -> Result<PendingMove<G::Move>, WorkerError>
    where
        G: Game + Send + 'static,
        G::Board: Send + 'static,
        G::Move: Send + 'static,
    {
        Self::spawn_with_config(game, board, side, difficulty, Arc::new(EngineConfig::default()))
    }

    pub fn spawn_with_config<G>(
        game: G,
        board: G::Board,
        side: Side,
        difficulty: Difficulty,
        config: Arc<EngineConfig>,
    ) -> Result<PendingMove<G::Move>, WorkerError>
    where
        G: Game + Send + 'static,
        G::Board: Send + 'static,
        G::Move: Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        thread::Builder::new()
            .name(format!("{}-search", G::NAME))
            .spawn(move || {
                let mut player = AiPlayer::with_config(&game, difficulty, config)
                    .with_cancel(Arc::clone(&flag));
                let output = match player.decide(&board, side) {
                    Some(decision) => Output::MoveFound(decision.mv, decision.stats),
                    None => Output::NoMove,
                };
                if flag.load(Ordering::Relaxed) {
                    warn!("{}: search cancelled, returning best move so far", G::NAME);
                }
                if tx.send(output).is_err() {
                    debug!("{}: result dropped, nobody is waiting", G::NAME);
                }
            })?;

        Ok(PendingMove { rx, cancel })
    }
}
