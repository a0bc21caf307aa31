use tracker_model::{clamp_progress, compute_progress, Entry, EntryKind, Milestone};

fn milestones(done: &[bool]) -> Vec<Milestone> {
    done.iter()
        .enumerate()
        .map(|(i, d)| {
            let m = Milestone::new(format!("m{i}"), format!("Step {i}"));
            if *d { m.done() } else { m }
        })
        .collect()
}

#[test]
fn empty_milestones_mean_unchanged() {
    assert_eq!(compute_progress(&[]), None);
}

#[test]
fn all_done_is_one() {
    assert_eq!(compute_progress(&milestones(&[true, true, true])), Some(1.0));
}

#[test]
fn none_done_is_zero() {
    assert_eq!(compute_progress(&milestones(&[false, false])), Some(0.0));
}

#[test]
fn thirds() {
    assert_eq!(compute_progress(&milestones(&[true, false, false])), Some(1.0 / 3.0));
}

#[test]
fn clamp_bounds() {
    assert_eq!(clamp_progress(2.0), 1.0);
    assert_eq!(clamp_progress(-0.5), 0.0);
    assert_eq!(clamp_progress(f64::INFINITY), 1.0);
    assert_eq!(clamp_progress(f64::NEG_INFINITY), 0.0);
    assert_eq!(clamp_progress(f64::NAN), 0.0);
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn toggle_keeps_progress_derived(
            done in proptest::collection::vec(any::<bool>(), 1..40),
            pick in any::<proptest::sample::Index>(),
        ) {
            let entry = Entry::with_id("e", EntryKind::Show, "P").with_milestones(milestones(&done));
            let target = format!("m{}", pick.index(done.len()));
            let next = entry.toggled(&target).unwrap();
            let expected = next.done_count() as f64 / next.milestones.len() as f64;
            prop_assert_eq!(next.progress, expected);
        }

        #[test]
        fn toggle_twice_is_identity(
            done in proptest::collection::vec(any::<bool>(), 1..40),
            pick in any::<proptest::sample::Index>(),
        ) {
            let entry = Entry::with_id("e", EntryKind::Game, "P").with_milestones(milestones(&done));
            let target = format!("m{}", pick.index(done.len()));
            let back = entry.toggled(&target).unwrap().toggled(&target).unwrap();
            prop_assert_eq!(back, entry);
        }

        #[test]
        fn clamp_is_always_in_range(p in any::<f64>()) {
            let c = clamp_progress(p);
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
