use prizewheel_core::{
    config::SpinConfig,
    error::WheelError,
    planner::{
        angle_step, plan_spin, screen_rotation, sector_center, sector_span,
        sector_target_angle, sector_under_pointer, POINTER_BASE_OFFSET_DEGREES,
    },
    rng::WheelRng,
};

const SECTORS: usize = 6;

/// Wheel-space angle sitting under the pointer at `rotation`.
fn angle_under_pointer(rotation: f64) -> f64 {
    (-rotation).rem_euclid(360.0)
}

#[test]
fn geometry_of_a_six_sector_wheel() {
    assert_eq!(angle_step(SECTORS), 60.0);
    assert_eq!(sector_span(2, SECTORS), (120.0, 180.0));
    for i in 0..SECTORS {
        assert!((sector_center(i, SECTORS) - (i as f64 + 0.5) * 60.0).abs() < 1e-12);
    }
    assert_eq!(sector_target_angle(0, SECTORS), 330.0);
    assert_eq!(sector_target_angle(2, SECTORS), 210.0);
    assert_eq!(sector_target_angle(5, SECTORS), 30.0);
    assert_eq!(screen_rotation(210.0), 210.0 + POINTER_BASE_OFFSET_DEGREES);
}

/// Outcome C (index 2) from a fresh wheel lands at turns*360 + 210 + jitter.
#[test]
fn example_sector_c_from_zero() {
    let spin = SpinConfig::default();
    let mut seen_turns = [false; 3];

    for seed in 0..200u64 {
        let mut rng = WheelRng::seeded(seed);
        let plan = plan_spin(0.0, 2, SECTORS, &spin, &mut rng).unwrap();

        assert_eq!(plan.sector_target_angle, 210.0);
        assert_eq!(plan.alignment_degrees, 210.0);
        assert!((5..=7).contains(&plan.full_turns));
        assert!(plan.jitter_degrees.abs() <= spin.effective_jitter(SECTORS));

        let expected =
            plan.full_turns as f64 * 360.0 + 210.0 + plan.jitter_degrees;
        assert!((plan.target_rotation - expected).abs() < 1e-9);

        seen_turns[(plan.full_turns - 5) as usize] = true;
    }
    assert_eq!(seen_turns, [true, true, true], "every turn count 5..=7 should occur");
}

#[test]
fn every_sector_lands_under_the_pointer() {
    let spin = SpinConfig::default();
    for seed in 0..50u64 {
        let mut rng = WheelRng::seeded(seed);
        for index in 0..SECTORS {
            let plan = plan_spin(0.0, index, SECTORS, &spin, &mut rng).unwrap();
            assert_eq!(sector_under_pointer(plan.target_rotation, SECTORS), index);

            let offset = angle_under_pointer(plan.target_rotation) - sector_center(index, SECTORS);
            assert!(
                offset.abs() <= spin.effective_jitter(SECTORS) + 1e-9,
                "sector {index} landed {offset:.3}° from centre"
            );
        }
    }
}

#[test]
fn target_is_always_ahead_of_current() {
    let spin = SpinConfig::default();
    let mut rng = WheelRng::seeded(0xF00D);
    for &current in &[0.0, 15.5, 359.9, 360.0, 1_234.5, 100_000.0, -720.0] {
        for index in 0..SECTORS {
            let plan = plan_spin(current, index, SECTORS, &spin, &mut rng).unwrap();
            assert!(
                plan.target_rotation > current,
                "{} is not ahead of {current}",
                plan.target_rotation
            );
            assert!(plan.travel() >= spin.min_full_turns as f64 * 360.0 - spin.effective_jitter(SECTORS));
        }
    }
}

/// From an arbitrary orientation the alignment is measured from where the
/// wheel currently points, so the chosen sector still ends under the pointer.
#[test]
fn non_zero_start_still_lands_the_chosen_sector() {
    let spin = SpinConfig { max_jitter_degrees: Some(0.0), ..SpinConfig::default() };
    let mut rng = WheelRng::seeded(3);
    for &current in &[37.0, 250.0, 4_000.25] {
        for index in 0..SECTORS {
            let plan = plan_spin(current, index, SECTORS, &spin, &mut rng).unwrap();
            assert!((0.0..360.0).contains(&plan.alignment_degrees));
            let landed = angle_under_pointer(plan.target_rotation);
            assert!((landed - sector_center(index, SECTORS)).abs() < 1e-6);
        }
    }
}

#[test]
fn zero_jitter_centres_exactly() {
    let spin = SpinConfig { max_jitter_degrees: Some(0.0), ..SpinConfig::default() };
    let mut rng = WheelRng::seeded(11);
    let plan = plan_spin(0.0, 4, SECTORS, &spin, &mut rng).unwrap();
    assert_eq!(plan.jitter_degrees, 0.0);
    assert_eq!(angle_under_pointer(plan.target_rotation), sector_center(4, SECTORS));
}

#[test]
fn out_of_range_sector_is_rejected() {
    let spin = SpinConfig::default();
    let mut rng = WheelRng::seeded(1);
    assert!(matches!(
        plan_spin(0.0, 6, SECTORS, &spin, &mut rng),
        Err(WheelError::SectorOutOfRange { index: 6, count: 6 })
    ));
    assert!(matches!(
        plan_spin(0.0, 0, 0, &spin, &mut rng),
        Err(WheelError::SectorOutOfRange { .. })
    ));
}

#[test]
fn invalid_spin_settings_are_rejected() {
    let mut rng = WheelRng::seeded(1);

    let inverted = SpinConfig { min_full_turns: 8, max_full_turns: 5, ..SpinConfig::default() };
    assert!(matches!(
        plan_spin(0.0, 0, SECTORS, &inverted, &mut rng),
        Err(WheelError::InvalidSpinConfig(_))
    ));

    // Half a sector is 30°; jitter that large could cross into a neighbour.
    let wobbly = SpinConfig { max_jitter_degrees: Some(30.0), ..SpinConfig::default() };
    assert!(matches!(
        plan_spin(0.0, 0, SECTORS, &wobbly, &mut rng),
        Err(WheelError::InvalidSpinConfig(_))
    ));

    assert!(matches!(
        plan_spin(f64::NAN, 0, SECTORS, &SpinConfig::default(), &mut rng),
        Err(WheelError::InvalidSpinConfig(_))
    ));
}

#[test]
fn same_seed_same_plan() {
    let spin = SpinConfig::default();
    let a = plan_spin(0.0, 3, SECTORS, &spin, &mut WheelRng::seeded(77)).unwrap();
    let b = plan_spin(0.0, 3, SECTORS, &spin, &mut WheelRng::seeded(77)).unwrap();
    assert_eq!(a, b);
}
