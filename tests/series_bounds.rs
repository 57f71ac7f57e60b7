//! Shape and range guarantees of the mock series models.

use rand::rngs::StdRng;
use rand::SeedableRng;

use marketmood::series::{GeneratedSeries, MockSeriesGenerator, SeriesModel, SeriesRequest, TimeRange, DAY_MS};

const NOW: i64 = 1_760_882_700_000;

fn seeded(seed: u64) -> MockSeriesGenerator<StdRng> {
    MockSeriesGenerator::new(StdRng::seed_from_u64(seed))
}

#[test]
fn test_thirty_points_end_at_now() {
    let mut g = seeded(1);
    let walk = g.random_walk(30, 4567.89, 0.02, DAY_MS, NOW).unwrap();
    assert_eq!(walk.len(), 30);
    assert!(walk.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    assert_eq!(walk.last().unwrap().timestamp_ms, NOW);

    let vix = g.mean_reverting_vix(30, 22.0, DAY_MS, NOW).unwrap();
    assert_eq!(vix.len(), 30);
    assert_eq!(vix.last().unwrap().timestamp_ms, NOW);

    let breadth = g.breadth_pair(30, 55.0, 48.0, DAY_MS, NOW).unwrap();
    assert_eq!(breadth.len(), 30);
    assert!(breadth.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    assert_eq!(breadth.last().unwrap().timestamp_ms, NOW);
}

#[test]
fn test_vix_stays_in_band_over_long_runs() {
    for seed in 0..20 {
        let vix = seeded(seed).mean_reverting_vix(2000, 45.0, DAY_MS, NOW).unwrap();
        assert!(vix.iter().all(|p| (10.0..=50.0).contains(&p.value)), "seed {}", seed);
    }
}

#[test]
fn test_breadth_stays_in_bands() {
    for (seed, len) in [(1u64, 1usize), (2, 7), (3, 90), (4, 365), (5, 1500)] {
        let pts = seeded(seed).breadth_pair(len, 79.5, 74.0, DAY_MS, NOW).unwrap();
        assert_eq!(pts.len(), len);
        for p in &pts {
            assert!((20.0..=80.0).contains(&p.ma50), "ma50 {} out of band", p.ma50);
            assert!((15.0..=75.0).contains(&p.ma200), "ma200 {} out of band", p.ma200);
        }
    }
}

#[test]
fn test_zero_length_is_an_error() {
    let mut g = seeded(9);
    assert!(g.random_walk(0, 100.0, 0.02, DAY_MS, NOW).is_err());
    assert!(g.mean_reverting_vix(0, 20.0, DAY_MS, NOW).is_err());
    assert!(g.breadth_pair(0, 55.0, 48.0, DAY_MS, NOW).is_err());
    assert!(g.generate(SeriesModel::MeanRevertingVix, 0, 20.0, DAY_MS, NOW).is_err());
}

#[test]
fn test_same_seed_same_sequence() {
    let a = seeded(42).random_walk(60, 100.0, 0.02, DAY_MS, NOW).unwrap();
    let b = seeded(42).random_walk(60, 100.0, 0.02, DAY_MS, NOW).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_range_lengths() {
    let expected = [(TimeRange::OneDay, 24), (TimeRange::OneWeek, 7), (TimeRange::OneMonth, 30), (TimeRange::ThreeMonths, 90), (TimeRange::OneYear, 365)];
    for (range, len) in expected {
        let series = seeded(7)
            .generate(SeriesModel::RandomWalk { volatility: 0.02 }, range.points(), 100.0, range.period_ms(), NOW)
            .unwrap();
        assert_eq!(series.len(), len, "{}", range);
    }
}

#[test]
fn test_breadth_model_through_generic_entry() {
    let request = SeriesRequest { range: TimeRange::OneWeek, start_value: 55.0 };
    match seeded(3).generate_for_range(SeriesModel::BoundedBreadthPair, request, NOW).unwrap() {
        GeneratedSeries::Pair(points) => {
            assert_eq!(points.len(), 7);
            assert_eq!(points.last().unwrap().timestamp_ms, NOW);
        }
        GeneratedSeries::Single(_) => panic!("breadth model must produce a pair series"),
    }
}

#[test]
fn test_non_finite_start_is_an_error() {
    let mut g = seeded(10);
    assert!(g.mean_reverting_vix(1200, f64::NAN, DAY_MS, NOW).is_err());
    assert!(g.mean_reverting_vix(1200, f64::INFINITY, DAY_MS, NOW).is_err());
    assert!(g.breadth_pair(20, f64::NAN, 48.0, DAY_MS, NOW).is_err());
}
