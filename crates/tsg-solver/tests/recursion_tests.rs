use super::*;

#[test]
fn test_enter_leave_round_trip() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::InheritanceWalk);

    assert!(guard.enter(1).is_entered());
    assert_eq!(guard.depth(), 1);
    assert!(guard.is_visiting(&1));

    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.depth(), 2);

    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
    assert!(!guard.is_exceeded());
}

#[test]
fn test_cycle_detection() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::InheritanceWalk);

    assert!(guard.enter(7).is_entered());
    assert!(guard.enter(7).is_cycle());
    // A denied entry is not a limit failure
    assert!(!guard.is_exceeded());
    guard.leave(7);

    // After leaving, the key can be entered again
    assert!(guard.enter(7).is_entered());
    guard.leave(7);
}

#[test]
fn test_depth_exceeded() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Custom {
        max_depth: 2,
        max_iterations: 100,
    });

    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
}

#[test]
fn test_iterations_exceeded() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Custom {
        max_depth: 10,
        max_iterations: 3,
    });

    for key in 0..3u32 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(99), RecursionResult::IterationExceeded);
    assert!(guard.is_exceeded());
}

#[test]
fn test_scope_helper() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::InheritanceWalk);

    let value = guard
        .scope(1, |guard| {
            assert!(guard.is_visiting(&1));
            // Nested scope on the same key reports the cycle
            assert_eq!(guard.scope(1, |_| ()), Err(RecursionResult::Cycle));
            42
        })
        .expect("entered");

    assert_eq!(value, 42);
    assert!(!guard.is_visiting(&1));
}
