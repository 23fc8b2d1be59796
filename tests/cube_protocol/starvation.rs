//! Admission limit and starvation freedom

use super::*;
use std::sync::atomic::AtomicBool;

#[test]
fn admission_limit_forces_handoff() {
    let hooks = Arc::new(TestHooks::gated());
    let cube = Arc::new(
        Cube::builder()
            .size(3)
            .group_limit_factor(1)
            .poll_interval(TEST_POLL)
            .hooks(Arc::clone(&hooks))
            .build()
            .unwrap(),
    );
    assert_eq!(cube.coordinator_status().limit, 3);
    let never = CancellationToken::never;

    let first = spawn_rotation(&cube, Side::Up, 0, never());
    wait_until("first rotation", || hooks.rotations() == 1);
    let front = spawn_rotation(&cube, Side::Front, 0, never());
    wait_until("front representative", || cube.coordinator_status().waiting_groups == 1);

    // Still under the limit: admitted despite the waiting group.
    let second = spawn_rotation(&cube, Side::Up, 1, never());
    let third = spawn_rotation(&cube, Side::Up, 2, never());
    wait_until("limit reached", || hooks.rotations() == 3);
    assert_eq!(cube.coordinator_status().let_in, 3);

    // Over the limit: queues behind the front rotation.
    let late = spawn_rotation(&cube, Side::Up, 0, never());
    wait_until("late rotation queued", || {
        cube.coordinator_status().waiting[Group::UpDown.index()] == 1
    });
    assert_eq!(cube.coordinator_status().running, 3);

    hooks.gate.open();
    for handle in [first, front, second, third, late] {
        handle.join().unwrap().unwrap();
    }

    let expected = sequential(
        3,
        &[
            (Side::Up, 0),
            (Side::Up, 1),
            (Side::Up, 2),
            (Side::Front, 0),
            (Side::Up, 0),
        ],
    );
    // UP, then FRONT, then the queued UP
    assert_eq!(cube.metrics().coordinator.episodes, 3);
    assert_eq!(cube.show().unwrap().to_string(), expected);
}

#[test]
fn foreign_rotation_completes_under_continuous_load() {
    let cube = plain_cube(3);
    let stop = Arc::new(AtomicBool::new(false));
    let threads = 8;

    let stream: Vec<_> = (0..threads)
        .map(|t| {
            let cube = Arc::clone(&cube);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut done = 0usize;
                while !stop.load(Ordering::SeqCst) {
                    let side = if t % 2 == 0 { Side::Up } else { Side::Down };
                    cube.rotate(side, done % 3).unwrap();
                    done += 1;
                }
                done
            })
        })
        .collect();

    wait_until("stream running", || cube.metrics().rotations > 100);
    let started = Instant::now();
    cube.rotate(Side::Front, 1).unwrap();
    let waited = started.elapsed();

    stop.store(true, Ordering::SeqCst);
    let streamed: usize = stream.into_iter().map(|h| h.join().unwrap()).sum();

    assert!(waited < Duration::from_secs(5), "front waited {:?}", waited);
    assert_eq!(cube.metrics().rotations as usize, streamed + 1);
    assert!(cube.has_correct_color_counts());
    assert!(cube.coordinator_status().is_idle());
}

#[test]
fn every_group_makes_progress() {
    let cube = plain_cube(2);
    let stop = Arc::new(AtomicBool::new(false));

    let workers: Vec<_> = Group::ALL
        .into_iter()
        .flat_map(|group| std::iter::repeat(group).take(3))
        .map(|group| {
            let cube = Arc::clone(&cube);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let side = Side::ALL
                    .into_iter()
                    .find(|side| side.group() == group);
                let mut done = 0usize;
                while !stop.load(Ordering::SeqCst) {
                    match side {
                        Some(side) => cube.rotate(side, done % 2).unwrap(),
                        None => {
                            cube.show().unwrap();
                        }
                    }
                    done += 1;
                }
                (group, done)
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(300));
    stop.store(true, Ordering::SeqCst);

    let mut per_group = [0usize; Group::COUNT];
    for worker in workers {
        let (group, done) = worker.join().unwrap();
        per_group[group.index()] += done;
    }
    for group in Group::ALL {
        assert!(per_group[group.index()] > 0, "{} starved", group);
    }
    assert!(cube.has_correct_color_counts());
    assert!(cube.coordinator_status().is_idle());
}
