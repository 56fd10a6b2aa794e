use approx::assert_relative_eq;
use ward_engine::{simulate, ward_rates, Parameters, State, WardError};

fn reference() -> (State, Parameters) {
    let params = Parameters {
        capacity: 100.0,
        admission_rate: 0.1,
        discharge_rate: 0.1,
        staff_availability: 1.0,
        illness_prob: 0.005,
        population: 5000.0,
    };
    (State::new(50.0, 25.0), params)
}

#[test]
fn reference_scenario_has_fifty_equally_spaced_samples() {
    let (initial, params) = reference();
    let t = simulate(initial, &params, 50).unwrap();

    assert_eq!(t.len(), 50);
    let first = t.first().unwrap();
    assert_eq!((first.time, first.current, first.waiting), (0.0, 50.0, 25.0));
    assert_eq!(t.last().unwrap().time, 50.0);

    let times = t.times();
    let spacing = 50.0 / 49.0;
    for w in times.windows(2) {
        assert!(w[1] > w[0]);
        assert_relative_eq!(w[1] - w[0], spacing, epsilon = 1e-9);
    }
}

#[test]
fn reference_scenario_builds_a_backlog() {
    // 25 new patients a day against a ward that can turn over roughly 10.
    let (initial, params) = reference();
    let t = simulate(initial, &params, 50).unwrap();
    let last = t.last().unwrap();
    assert!(last.waiting > 25.0);
    assert!(last.current < params.capacity);
    assert!(t.waiting().iter().all(|w| w.is_finite()));
}

#[test]
fn identical_calls_are_bit_identical() {
    let (initial, params) = reference();
    let a = simulate(initial, &params, 73).unwrap();
    let b = simulate(initial, &params, 73).unwrap();
    for (x, y) in a.samples().iter().zip(b.samples()) {
        assert_eq!(x.time.to_bits(), y.time.to_bits());
        assert_eq!(x.current.to_bits(), y.current.to_bits());
        assert_eq!(x.waiting.to_bits(), y.waiting.to_bits());
    }
    assert_eq!(a, b);
}

#[test]
fn waiting_list_only_drains_without_new_illness() {
    let params = Parameters {
        capacity: 100.0,
        admission_rate: 0.5,
        discharge_rate: 0.5,
        staff_availability: 1.0,
        illness_prob: 0.0,
        population: 5000.0,
    };
    let t = simulate(State::new(10.0, 20.0), &params, 40).unwrap();

    assert!(t.current().iter().all(|p| *p < params.capacity));
    for w in t.waiting().windows(2) {
        assert!(w[1] <= w[0], "waiting rose from {} to {}", w[0], w[1]);
    }
}

#[test]
fn zero_capacity_is_a_domain_error() {
    let (initial, params) = reference();
    let params = Parameters { capacity: 0.0, ..params };
    match simulate(initial, &params, 50) {
        Err(WardError::Domain(message)) => assert!(message.contains("capacity")),
        other => panic!("expected a domain error, got {:?}", other),
    }
}

#[test]
fn single_day_is_a_domain_error() {
    let (initial, params) = reference();
    assert!(matches!(simulate(initial, &params, 1), Err(WardError::Domain(_))));
}

#[test]
fn negative_waiting_is_carried_not_clamped() {
    let (_, params) = reference();
    let rates = ward_rates(State::new(50.0, -4.0), &params).unwrap();
    assert!(rates.admitted < 0.0);

    let t = simulate(State::new(50.0, -4.0), &params, 10).unwrap();
    assert_eq!(t.first().unwrap().waiting, -4.0);
}

#[test]
fn overflowing_start_admits_nobody_until_below_capacity() {
    let (_, params) = reference();
    let t = simulate(State::new(150.0, 10.0), &params, 3).unwrap();
    let grid = t.samples();
    // Over capacity the queue only grows, by exactly 25 patients a day.
    let slope = (grid[1].waiting - grid[0].waiting) / (grid[1].time - grid[0].time);
    assert_relative_eq!(slope, 25.0, max_relative = 1e-9);
}
