//! Runs a search on a background thread so a host stays responsive.
//!
//! Cancellation is cooperative: [`SolveHandle::cancel`] raises a flag the
//! strategies poll between expansions, and the search then ends with
//! [`Outcome::Cancelled`].

use log::error;
use parking_lot::{Condvar, Mutex};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::puzzle::Puzzle;
use crate::search::{self, Algorithm, Outcome, SearchParams};

#[derive(Default)]
struct Slot {
    outcome: Mutex<Option<Outcome>>,
    ready: Condvar,
}

pub struct SolveHandle {
    algorithm: Algorithm,
    cancel: Arc<AtomicBool>,
    slot: Arc<Slot>,
    thread: Option<JoinHandle<()>>,
}

impl SolveHandle {
    pub fn spawn(
        puzzle: Arc<Puzzle>,
        algorithm: Algorithm,
        params: SearchParams,
    ) -> io::Result<Self> {
        let cancel = Arc::new(AtomicBool::new(false));
        let slot = Arc::new(Slot::default());

        let thread = {
            let cancel = Arc::clone(&cancel);
            let slot = Arc::clone(&slot);
            thread::Builder::new()
                .name(format!("solve-{}", algorithm.name()))
                .spawn(move || {
                    let outcome = search::solve(&puzzle, algorithm, &params, Some(&cancel));
                    *slot.outcome.lock() = Some(outcome);
                    slot.ready.notify_all();
                })?
        };

        Ok(SolveHandle {
            algorithm,
            cancel,
            slot,
            thread: Some(thread),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Asks the search to stop at its next poll.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.slot.outcome.lock().is_some()
    }

    /// The outcome, if the search has ended. Never blocks on the search.
    pub fn try_outcome(&self) -> Option<Outcome> {
        self.slot.outcome.lock().clone()
    }

    /// Blocks until the search ends.
    pub fn wait(mut self) -> Outcome {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("{} worker panicked", self.algorithm);
            }
        }
        // a panicked worker leaves the slot empty
        self.slot.outcome.lock().take().unwrap_or(Outcome::Cancelled)
    }

    /// Waits up to `timeout`, then cancels and waits for the search to
    /// acknowledge.
    pub fn wait_timeout(self, timeout: Duration) -> Outcome {
        let deadline = Instant::now() + timeout;
        {
            let mut outcome = self.slot.outcome.lock();
            while outcome.is_none() {
                if self.slot.ready.wait_until(&mut outcome, deadline).timed_out() {
                    break;
                }
            }
        }
        if !self.is_finished() {
            self.cancel();
        }
        self.wait()
    }
}

impl Drop for SolveHandle {
    fn drop(&mut self) {
        // an abandoned search should not keep burning a core
        if self.thread.is_some() {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Arc<Puzzle> {
        Arc::new(Puzzle::new(&[10], &["######", "#@$ .#", "######"]).unwrap())
    }

    #[test]
    fn background_solve_reports_outcome() {
        let handle = SolveHandle::spawn(small(), Algorithm::Ucs, SearchParams::default()).unwrap();
        assert_eq!(handle.algorithm(), Algorithm::Ucs);
        let outcome = handle.wait();
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.move_string(), "RR");
    }

    #[test]
    fn generous_timeout_does_not_cancel() {
        let handle =
            SolveHandle::spawn(small(), Algorithm::AStar, SearchParams::default()).unwrap();
        let outcome = handle.wait_timeout(Duration::from_secs(30));
        assert!(outcome.is_solved());
    }

    #[test]
    fn zero_timeout_on_large_level_cancels_or_finishes() {
        let puzzle = Arc::new(
            Puzzle::new(
                &[1, 1, 1],
                &[
                    "############",
                    "#@         #",
                    "#  $   $   #",
                    "#     $    #",
                    "#          #",
                    "#  .  .  . #",
                    "#          #",
                    "############",
                ],
            )
            .unwrap(),
        );
        let params = SearchParams {
            cancel_check_interval: 1,
            ..SearchParams::default()
        };
        let handle = SolveHandle::spawn(puzzle, Algorithm::Bfs, params).unwrap();
        let outcome = handle.wait_timeout(Duration::ZERO);
        // the worker may legitimately win the race on a fast machine
        assert!(matches!(outcome, Outcome::Cancelled | Outcome::Solved(_)));
    }
}
