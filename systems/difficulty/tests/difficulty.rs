use reef_rush_system_difficulty::{CurveTuning, DifficultyCurve};

const LEVELS: usize = 30;

#[test]
fn score_target_interpolates_between_endpoints() {
    let curve = DifficultyCurve::default();

    assert_eq!(curve.generate(0, LEVELS).score_target, 100);
    assert_eq!(curve.generate(29, LEVELS).score_target, 500);

    // round(100 + 400 * 14/29)
    assert_eq!(curve.generate(14, LEVELS).score_target, 293);
}

#[test]
fn time_budget_shrinks_between_endpoints() {
    let curve = DifficultyCurve::default();

    assert!((curve.generate(0, LEVELS).time_budget_seconds - 90.0).abs() < 1e-4);
    assert!((curve.generate(29, LEVELS).time_budget_seconds - 75.0).abs() < 1e-4);
}

#[test]
fn primary_weight_interpolates_between_endpoints() {
    let curve = DifficultyCurve::default();

    let first = curve.generate(0, LEVELS).spawn_config.primary_weight;
    let last = curve.generate(29, LEVELS).spawn_config.primary_weight;
    assert!((first - 0.7).abs() < 1e-4);
    assert!((last - 0.3).abs() < 1e-4);
}

#[test]
fn bonus_probability_is_non_decreasing_and_saturates() {
    let curve = DifficultyCurve::default();
    let span = 4_000;

    let mut previous = 0.0f32;
    for index in 0..span {
        let bonus = curve
            .generate(index, span)
            .spawn_config
            .bonus_probability_percent;
        assert!(bonus >= previous, "bonus regressed at level {index}");
        assert!(bonus <= 15.0, "bonus exceeded ceiling at level {index}");
        previous = bonus;
    }

    // The increment accrues with the absolute index, so a deep enough
    // sequence must actually reach the ceiling.
    assert!((previous - 15.0).abs() < 1e-4);
}

#[test]
fn bonus_probability_counts_from_one_on_the_percent_scale() {
    let curve = DifficultyCurve::default();

    // Level 0 already carries one increment; the values stay fractions of a
    // percent and are compared against a 0..100 roll untouched.
    let first = curve.generate(0, LEVELS).spawn_config.bonus_probability_percent;
    assert!((first - 0.005).abs() < 1e-6);

    let tenth = curve.generate(9, LEVELS).spawn_config.bonus_probability_percent;
    assert!((tenth - 0.05).abs() < 1e-5);
}

#[test]
fn speed_multiplier_climbs_to_its_ceiling() {
    let curve = DifficultyCurve::default();
    let span = 300;

    let mut previous = 0.0f32;
    for index in 0..span {
        let speed = curve.generate(index, span).spawn_config.speed_multiplier;
        assert!(speed >= previous, "speed regressed at level {index}");
        assert!(speed <= 2.0, "speed exceeded ceiling at level {index}");
        previous = speed;
    }
    assert!((previous - 2.0).abs() < 1e-4);

    let first = curve.generate(0, span).spawn_config.speed_multiplier;
    assert!((first - 1.0).abs() < 1e-4);
}

#[test]
fn spawn_interval_decays_to_its_floor() {
    let curve = DifficultyCurve::default();
    let span = 300;

    let mut previous = f32::MAX;
    for index in 0..span {
        let interval = curve
            .generate(index, span)
            .spawn_config
            .base_interval_seconds;
        assert!(interval <= previous, "interval grew at level {index}");
        assert!(interval >= 0.6, "interval undercut floor at level {index}");
        previous = interval;
    }

    let first = curve.generate(0, span).spawn_config.base_interval_seconds;
    assert!((first - 5.0).abs() < 1e-4);
}

#[test]
fn generation_is_deterministic() {
    let curve = DifficultyCurve::default();
    for index in 0..LEVELS {
        assert_eq!(curve.generate(index, LEVELS), curve.generate(index, LEVELS));
    }
}

#[test]
fn environments_cycle_across_the_sequence() {
    let curve = DifficultyCurve::default();
    let themes = &curve.tuning().environments;

    for index in 0..LEVELS {
        let level = curve.generate(index, LEVELS);
        assert_eq!(level.environment_id, themes[index % themes.len()]);
    }
}

#[test]
fn generated_table_passes_validation_and_wraps() {
    let curve = DifficultyCurve::default();
    let table = curve.generate_table(LEVELS).expect("table");

    assert_eq!(table.len(), LEVELS);
    assert_eq!(table.get(LEVELS).score_target, table.get(0).score_target);
}

#[test]
fn custom_tuning_flows_through_generation() {
    let tuning = CurveTuning {
        initial_score_target: 50.0,
        final_score_target: 150.0,
        ..CurveTuning::default()
    };
    let curve = DifficultyCurve::new(tuning).expect("curve");

    assert_eq!(curve.generate(0, 3).score_target, 50);
    assert_eq!(curve.generate(1, 3).score_target, 100);
    assert_eq!(curve.generate(2, 3).score_target, 150);
}
