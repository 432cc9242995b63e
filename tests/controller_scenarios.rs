use leibniz_series::{
    ChartPolicy, Config, Controller, ControllerError, INITIAL_APPROXIMATION, Mode, Variant,
    approximate_pi,
};

fn threshold_1000() -> Controller {
    Controller::new(Variant::Ranged.builder().build().unwrap())
}

#[test]
fn one_term_is_the_initial_value() {
    let mut c = threshold_1000();
    let update = c.request_term_count(1.0).unwrap();
    assert_eq!(update.approximation, INITIAL_APPROXIMATION);
    assert_eq!(update.samples.len(), 1);
    assert!(!update.alert.active);
}

#[test]
fn five_terms_chart_every_partial_sum() {
    let mut c = threshold_1000();
    let update = c.request_term_count(5.0).unwrap();
    assert_eq!(update.approximation, "3.3396825396825396825");
    let counts: Vec<u32> = update.samples.iter().map(|p| p.term_count).collect();
    assert_eq!(counts, vec![1, 2, 3, 4, 5]);
    assert_eq!(update.samples[4].value, update.approximation);
    assert!(!update.alert.active);
}

#[test]
fn alert_switches_on_at_the_threshold() {
    let mut c = threshold_1000();
    assert!(!c.request_term_count(999.0).unwrap().alert.active);

    let update = c.request_term_count(1_000.0).unwrap();
    assert_eq!(update.approximation, "3.1405926538397929260");
    assert!(update.alert.active);
    assert!(update.alert.message.is_some());
    assert!(update.alert.intensity.abs() < f64::EPSILON);

    let update = c.request_term_count(10_000.0).unwrap();
    assert!((update.alert.intensity - 1.0).abs() < f64::EPSILON);
}

#[test]
fn classic_boundary_sits_at_three_thousand() {
    let mut c = Controller::new(Variant::Classic.builder().build().unwrap());
    assert!(!c.request_term_count(2_999.0).unwrap().alert.active);
    assert!(c.request_term_count(3_000.0).unwrap().alert.active);
    assert_eq!(c.accumulator().mode(), Mode::FullRecompute);
}

#[test]
fn resets_return_to_the_initial_state() {
    let mut c = threshold_1000();
    c.request_term_count(4_321.0).unwrap();
    let update = c.select_range_limit(1_000).unwrap();
    assert_eq!(update.state.power(), 1);
    assert_eq!(update.state.range_limit(), 1_000);
    assert_eq!(update.approximation, INITIAL_APPROXIMATION);
    assert!(update.samples.is_empty());

    // the new limit clamps subsequent requests
    let update = c.request_term_count(9_999.0).unwrap();
    assert_eq!(update.state.power(), 1_000);
}

#[test]
fn non_positive_requests_are_rejected() {
    let mut c = threshold_1000();
    for bad in [0.0, -5.0] {
        assert!(matches!(
            c.request_term_count(bad),
            Err(ControllerError::InvalidTermCount { .. })
        ));
    }
    assert_eq!(c.state().power(), 1);
    assert_eq!(c.approximation(), INITIAL_APPROXIMATION);
}

#[test]
fn history_and_dense_agree_on_the_approximation() {
    let dense = Config::builder()
        .range_limits([500])
        .warning_threshold(100)
        .chart(ChartPolicy::Dense)
        .build()
        .unwrap();
    let history = Config::builder()
        .range_limits([500])
        .warning_threshold(100)
        .chart(ChartPolicy::History)
        .build()
        .unwrap();
    let (mut a, mut b) = (Controller::new(dense), Controller::new(history));
    for n in [40.0, 12.0, 300.0] {
        let (ua, ub) = (a.request_term_count(n).unwrap(), b.request_term_count(n).unwrap());
        assert_eq!(ua.approximation, ub.approximation);
    }
    assert_eq!(b.samples().len(), 2);
    assert_eq!(a.samples().len(), 300);
}

#[test]
fn one_shot_helper_matches_the_controller() {
    assert_eq!(approximate_pi(100).unwrap(), "3.1315929035585527643");
    assert!(approximate_pi(0).is_err());
}
