//! Hook invocation and balance

use super::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;
use std::sync::Weak;

#[test]
fn callbacks_receive_side_and_layer() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let cube = {
        let before = Arc::clone(&seen);
        let after = Arc::clone(&seen);
        Cube::new(
            4,
            move |side, layer| before.lock().push(("before", side, layer)),
            move |side, layer| after.lock().push(("after", side, layer)),
            || {},
            || {},
        )
        .unwrap()
    };

    cube.rotate(Side::Back, 3).unwrap();
    cube.rotate(Side::Left, 1).unwrap();

    assert_eq!(
        *seen.lock(),
        vec![
            ("before", Side::Back, 3),
            ("after", Side::Back, 3),
            ("before", Side::Left, 1),
            ("after", Side::Left, 1),
        ]
    );
}

#[test]
fn show_hooks_bracket_the_read() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let cube = {
        let before = Arc::clone(&events);
        let after = Arc::clone(&events);
        Cube::new(
            2,
            |_, _| {},
            |_, _| {},
            move || before.lock().push("before_show"),
            move || after.lock().push("after_show"),
        )
        .unwrap()
    };

    cube.show().unwrap();
    cube.show().unwrap();
    assert_eq!(
        *events.lock(),
        vec!["before_show", "after_show", "before_show", "after_show"]
    );
}

/// Hooks that inspect the cube they are installed on
#[derive(Default)]
struct Inspector {
    cube: Mutex<Weak<Cube>>,
    violations: AtomicUsize,
}

impl Inspector {
    fn check(&self, group: Group) {
        let Some(cube) = self.cube.lock().upgrade() else {
            return;
        };
        let status = cube.coordinator_status();
        if status.working_group != Some(group) || status.running == 0 {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl CubeHooks for Inspector {
    fn before_rotation(&self, side: Side, _layer: usize) {
        self.check(side.group());
    }

    fn after_rotation(&self, side: Side, _layer: usize) {
        self.check(side.group());
    }

    fn before_show(&self) {
        self.check(Group::Show);
    }

    fn after_show(&self) {
        self.check(Group::Show);
    }
}

#[test]
fn hooks_run_inside_admission_and_outside_coordination_lock() {
    let inspector = Arc::new(Inspector::default());
    let cube = Arc::new(
        Cube::builder()
            .size(3)
            .hooks(Arc::clone(&inspector))
            .build()
            .unwrap(),
    );
    *inspector.cube.lock() = Arc::downgrade(&cube);

    thread::scope(|scope| {
        for t in 0..8 {
            let cube = &cube;
            scope.spawn(move || {
                for i in 0..100 {
                    if (t + i) % 5 == 0 {
                        cube.show().unwrap();
                    } else {
                        cube.rotate(Side::ALL[(t + i) % Side::COUNT], i % 3).unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(inspector.violations.load(Ordering::SeqCst), 0);
    *inspector.cube.lock() = Weak::new();
}

#[test]
fn hooks_stay_balanced_with_cancellations() {
    let hooks = Arc::new(TestHooks::sleeping(Duration::from_micros(100)));
    let cube = cube_with_hooks(3, Arc::clone(&hooks));

    let cancelled: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cube = &cube;
                scope.spawn(move || {
                    let mut cancelled = 0;
                    for i in 0..100 {
                        let token = CancellationToken::new();
                        if i % 3 == 0 {
                            token.cancel();
                        }
                        let outcome = if i % 4 == 0 {
                            cube.show_cancellable(&token).map(|_| ())
                        } else {
                            cube.rotate_cancellable(Side::ALL[(t + i) % Side::COUNT], i % 3, &token)
                        };
                        match outcome {
                            Ok(()) => {}
                            Err(e) if e.is_cancelled() => cancelled += 1,
                            Err(e) => panic!("unexpected error: {}", e),
                        }
                    }
                    cancelled
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    hooks.assert_balanced();
    let metrics = cube.metrics();
    assert_eq!(metrics.cancelled as usize, cancelled);
    assert_eq!(metrics.rotations as usize, hooks.rotations());
    assert_eq!(metrics.shows as usize, hooks.shows());
    assert_eq!(hooks.rotations() + hooks.shows() + cancelled, 800);
    assert!(cube.has_correct_color_counts());
    assert!(cube.coordinator_status().is_idle());
}

/// Hooks whose first rotation and first show panic
#[derive(Default)]
struct PanicOnce {
    rotation_fired: AtomicBool,
    show_fired: AtomicBool,
}

impl CubeHooks for PanicOnce {
    fn before_rotation(&self, side: Side, layer: usize) {
        if !self.rotation_fired.swap(true, Ordering::SeqCst) {
            panic!("before_rotation failed on {} layer {}", side, layer);
        }
    }

    fn after_show(&self) {
        if !self.show_fired.swap(true, Ordering::SeqCst) {
            panic!("after_show failed");
        }
    }
}

fn panicking_cube() -> Cube {
    Cube::builder()
        .size(3)
        .poll_interval(TEST_POLL)
        .hooks(PanicOnce::default())
        .build()
        .unwrap()
}

#[test]
fn panicking_rotation_hook_releases_admission_and_layer() {
    let cube = panicking_cube();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| cube.rotate(Side::Up, 0)));
    assert!(outcome.is_err());
    assert!(cube.coordinator_status().is_idle());
    // The hook runs before the turn, so nothing moved.
    assert!(cube.is_solved());

    // DOWN layer 2 is the same slice as UP layer 0.
    cube.rotate(Side::Down, 2).unwrap();
    assert!(cube.coordinator_status().is_idle());
    assert_eq!(cube.metrics().rotations, 1);
    // The first show panics in its after-hook; the second one reports.
    let _ = panic::catch_unwind(AssertUnwindSafe(|| cube.show()));
    assert_eq!(
        cube.show().unwrap().to_string(),
        sequential(3, &[(Side::Down, 2)])
    );
}

#[test]
fn panicking_show_hook_releases_admission() {
    let cube = panicking_cube();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| cube.show()));
    assert!(outcome.is_err());
    assert!(cube.coordinator_status().is_idle());

    // Another group can take over once the show group has drained.
    cube.rotate(Side::Left, 1).unwrap();
    cube.rotate(Side::Right, 1).unwrap();
    assert!(cube.show().unwrap().is_solved());
    assert!(cube.coordinator_status().is_idle());
}
