//! Cube Protocol Test Suite
//!
//! Exercises the public `Cube` API end to end:
//!
//! 1. Rotation geometry against known facelet strings
//! 2. Algebraic laws (cycles, antagonist turns, conservation)
//! 3. Concurrent safety and serializability
//! 4. Cancellation at every suspension point
//! 5. Starvation bound and hook balance
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test cube_protocol
//! cargo test --test cube_protocol cancellation::
//! ```

use concurrent_cube::prelude::*;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

mod hooks;
mod starvation;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Poll interval used by test cubes so cancellations are observed quickly
pub const TEST_POLL: Duration = Duration::from_millis(1);

/// Build a cube with the given hooks and a short poll interval
pub fn cube_with_hooks(size: usize, hooks: Arc<TestHooks>) -> Arc<Cube> {
    Arc::new(
        Cube::builder()
            .size(size)
            .poll_interval(TEST_POLL)
            .hooks(hooks)
            .build()
            .expect("valid test cube"),
    )
}

/// Build a cube without hooks
pub fn plain_cube(size: usize) -> Arc<Cube> {
    cube_with_hooks(size, Arc::new(TestHooks::counting()))
}

/// Spin until `condition` holds, failing the test after ten seconds
pub fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(1));
    }
}

/// One-shot latch that blocks callers until opened
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn opened() -> Self {
        let gate = Self::default();
        gate.open();
        gate
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.opened.notify_all();
    }

    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.opened.wait(&mut open);
        }
    }
}

/// Hooks that count invocations, optionally sleep, and optionally block
/// every rotation on a gate
pub struct TestHooks {
    pub before_rotation: AtomicUsize,
    pub after_rotation: AtomicUsize,
    pub before_show: AtomicUsize,
    pub after_show: AtomicUsize,
    pub gate: Gate,
    pub delay: Duration,
}

impl TestHooks {
    pub fn counting() -> Self {
        Self::with(Gate::opened(), Duration::ZERO)
    }

    pub fn gated() -> Self {
        Self::with(Gate::closed(), Duration::ZERO)
    }

    pub fn sleeping(delay: Duration) -> Self {
        Self::with(Gate::opened(), delay)
    }

    fn with(gate: Gate, delay: Duration) -> Self {
        Self {
            before_rotation: AtomicUsize::new(0),
            after_rotation: AtomicUsize::new(0),
            before_show: AtomicUsize::new(0),
            after_show: AtomicUsize::new(0),
            gate,
            delay,
        }
    }

    pub fn rotations(&self) -> usize {
        self.before_rotation.load(Ordering::SeqCst)
    }

    pub fn shows(&self) -> usize {
        self.before_show.load(Ordering::SeqCst)
    }

    pub fn assert_balanced(&self) {
        assert_eq!(
            self.before_rotation.load(Ordering::SeqCst),
            self.after_rotation.load(Ordering::SeqCst)
        );
        assert_eq!(
            self.before_show.load(Ordering::SeqCst),
            self.after_show.load(Ordering::SeqCst)
        );
    }
}

impl CubeHooks for TestHooks {
    fn before_rotation(&self, _side: Side, _layer: usize) {
        self.before_rotation.fetch_add(1, Ordering::SeqCst);
        self.gate.wait();
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    fn after_rotation(&self, _side: Side, _layer: usize) {
        self.after_rotation.fetch_add(1, Ordering::SeqCst);
    }

    fn before_show(&self) {
        self.before_show.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    fn after_show(&self) {
        self.after_show.fetch_add(1, Ordering::SeqCst);
    }
}

/// Spawn a rotation on its own thread
pub fn spawn_rotation(
    cube: &Arc<Cube>,
    side: Side,
    layer: usize,
    token: CancellationToken,
) -> thread::JoinHandle<Result<()>> {
    let cube = Arc::clone(cube);
    thread::spawn(move || cube.rotate_cancellable(side, layer, &token))
}

/// Apply `moves` one after another on a fresh cube and return its string form
pub fn sequential(size: usize, moves: &[(Side, usize)]) -> String {
    let cube = Cube::builder().size(size).build().expect("valid test cube");
    for (side, layer) in moves {
        cube.rotate(*side, *layer).expect("uncancellable rotation");
    }
    cube.show().expect("uncancellable show").to_string()
}

/// Shorthand for moves given as `(side index, layer)` pairs
pub fn moves(raw: &[(usize, usize)]) -> Vec<(Side, usize)> {
    raw.iter()
        .map(|(side, layer)| (Side::from_index(*side).expect("side index"), *layer))
        .collect()
}
