//! Simple profiling macros using thread-local storage
//!
//! Lightweight timing of the search hot paths without changing function signatures.
//! Enable with environment variable: QUORIDOR_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Timed categories, in report order
const CATEGORIES: [&str; 6] = ["move_gen", "wall_gen", "eval", "bfs", "iteration", "apply_move"];

thread_local! {
    static TIMES: RefCell<[u64; 6]> = const { RefCell::new([0; 6]) };
    static COUNTS: RefCell<[usize; 6]> = const { RefCell::new([0; 6]) };
    static CUTOFFS: RefCell<usize> = const { RefCell::new(0) };
    static TT_LOOKUPS: RefCell<usize> = const { RefCell::new(0) };
    static TT_HITS: RefCell<usize> = const { RefCell::new(0) };
}

// Global aggregators
static GLOBAL_TIMES: [AtomicU64; 6] = [const { AtomicU64::new(0) }; 6];
static GLOBAL_COUNTS: [AtomicUsize; 6] = [const { AtomicUsize::new(0) }; 6];
static GLOBAL_CUTOFFS: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_TT_LOOKUPS: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_TT_HITS: AtomicUsize = AtomicUsize::new(0);

#[inline]
pub fn is_profiling_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("QUORIDOR_PROFILE").is_ok())
}

pub struct ProfileGuard {
    start: Instant,
    index: usize,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if !is_profiling_enabled() {
            return None;
        }

        CATEGORIES
            .iter()
            .position(|&c| c == category)
            .map(|index| ProfileGuard {
                start: Instant::now(),
                index,
            })
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        TIMES.with(|t| t.borrow_mut()[self.index] += elapsed_ns);
        COUNTS.with(|c| c.borrow_mut()[self.index] += 1);
    }
}

#[inline]
pub fn record_cutoff() {
    if is_profiling_enabled() {
        CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

#[inline]
pub fn record_tt_lookup(hit: bool) {
    if is_profiling_enabled() {
        TT_LOOKUPS.with(|c| *c.borrow_mut() += 1);
        if hit {
            TT_HITS.with(|c| *c.borrow_mut() += 1);
        }
    }
}

/// Folds this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    TIMES.with(|t| {
        for (global, local) in GLOBAL_TIMES.iter().zip(t.borrow_mut().iter_mut()) {
            global.fetch_add(*local, Ordering::Relaxed);
            *local = 0;
        }
    });
    COUNTS.with(|c| {
        for (global, local) in GLOBAL_COUNTS.iter().zip(c.borrow_mut().iter_mut()) {
            global.fetch_add(*local, Ordering::Relaxed);
            *local = 0;
        }
    });

    for (local, global) in [
        (&CUTOFFS, &GLOBAL_CUTOFFS),
        (&TT_LOOKUPS, &GLOBAL_TT_LOOKUPS),
        (&TT_HITS, &GLOBAL_TT_HITS),
    ] {
        local.with(|c| {
            global.fetch_add(*c.borrow(), Ordering::Relaxed);
            *c.borrow_mut() = 0;
        });
    }
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for (i, name) in CATEGORIES.iter().enumerate() {
        let time = GLOBAL_TIMES[i].load(Ordering::Relaxed);
        let count = GLOBAL_COUNTS[i].load(Ordering::Relaxed);
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!(
            "{:<12} {:>10.2}ms ({:>5.1}%) - {} calls, {:.2}µs avg",
            name,
            time as f64 / 1_000_000.0,
            pct,
            count,
            avg_us
        );
    }

    let cutoffs = GLOBAL_CUTOFFS.load(Ordering::Relaxed);
    let lookups = GLOBAL_TT_LOOKUPS.load(Ordering::Relaxed);
    let hits = GLOBAL_TT_HITS.load(Ordering::Relaxed);
    let hit_rate = if lookups > 0 { 100.0 * hits as f64 / lookups as f64 } else { 0.0 };

    eprintln!("\nCutoffs:    {}", cutoffs);
    eprintln!("TT Lookups: {}", lookups);
    eprintln!("TT Hits:    {} ({:.1}%)", hits, hit_rate);
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
