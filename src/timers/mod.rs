//! Nested wall-clock timers for solver phases.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Named phase timers.  A timer started while another one runs is
/// recorded under that timer's path, so `"factorisation"` started
/// inside `"solve"` is reported as `["solve", "factorisation"]`.
#[derive(Default, Debug)]
pub struct Timers {
    // running timers, innermost last, with the instant their clock last started
    running: Vec<(&'static str, Instant)>,
    suspended: bool,
    totals: HashMap<Vec<&'static str>, Duration>,
}

impl Timers {
    fn current_path(&self) -> Vec<&'static str> {
        self.running.iter().map(|&(key, _)| key).collect()
    }

    fn charge(&mut self, depth: usize, since: Instant) {
        let path = self.running[..=depth].iter().map(|&(key, _)| key).collect();
        *self.totals.entry(path).or_default() += since.elapsed();
    }

    /// Starts the timer `key` beneath the innermost running timer
    pub fn start_as_current(&mut self, key: &'static str) {
        self.running.push((key, Instant::now()));
        let path = self.current_path();
        self.totals.entry(path).or_default();
    }

    /// Stops the innermost running timer
    pub fn stop_current(&mut self) {
        if let Some(&(_, since)) = self.running.last() {
            if !self.suspended {
                self.charge(self.running.len() - 1, since);
            }
            self.running.pop();
        }
    }

    /// Stops every running clock until [`resume`](Self::resume).  Used
    /// for `notimeit!`
    pub fn suspend(&mut self) {
        if self.suspended {
            return;
        }
        for depth in 0..self.running.len() {
            let since = self.running[depth].1;
            self.charge(depth, since);
        }
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        if self.suspended {
            let now = Instant::now();
            self.running.iter_mut().for_each(|(_, since)| *since = now);
            self.suspended = false;
        }
    }

    /// Total time over all top level timers
    pub fn total_time(&self) -> Duration {
        self.totals
            .iter()
            .filter(|(path, _)| path.len() == 1)
            .map(|(_, &t)| t)
            .sum()
    }

    /// Elapsed time of a timer given by its path from the top,
    /// e.g. `&["solve", "factorisation"]`
    pub fn elapsed(&self, path: &[&'static str]) -> Option<Duration> {
        self.totals.get(path).copied()
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {
        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

macro_rules! notimeit {
    ($timer:ident; $($tt:tt)+) => {
        $timer.suspend();
        $(
            $tt
        )+
        $timer.resume();
    }
}
pub(crate) use notimeit;
