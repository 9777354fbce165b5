use kcenter::cluster::{
    check_conflict, estimate_bound, generate_radii, resolve_conflicts, Center, ClusteringResult,
    Comparison, Euclidean, KCenter, Point, StreamingKCenter, Termination, RADIUS_FLOOR,
};
use kcenter::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn two_tight_clusters_offline() {
    let data = vec![
        Point::new(0.0, 0.0),
        Point::new(0.05, 0.0),
        Point::new(5.0, 5.0),
        Point::new(5.05, 5.0),
        Point::new(5.0, 5.05),
    ];
    let radii = generate_radii(0.01, 10.0, 2.0).unwrap();
    let sol = KCenter::new(2, 0).cluster_offline(&data, &radii).unwrap();

    assert_eq!(sol.centers.len(), 2);
    assert!(sol.unclustered.is_empty());
    let mut sizes: Vec<usize> = sol.clusters.iter().map(Vec::len).collect();
    sizes.sort();
    assert_eq!(sizes, vec![2, 3]);
}

#[test]
fn repeated_point_never_yields_zero_lower_bound() {
    let outlier_count = 3;
    let data = vec![Point::new(1.5, -2.0); outlier_count + 2];
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let dmin = estimate_bound(&data, Comparison::Minimum, &mut rng).unwrap();
        assert!(dmin > 0.0);
        assert_eq!(dmin, RADIUS_FLOOR);
    }
}

#[test]
fn same_cluster_streamed_twice() {
    let cluster: Vec<Point> = (0..10)
        .map(|i| Point::new(1.0 + (i % 5) as f64 * 0.01, 1.0 + (i / 5) as f64 * 0.01))
        .collect();
    let model = StreamingKCenter::new(1, 0);

    let state = model
        .merge_batch(ClusteringResult::empty(0.01), &cluster, 1.0)
        .unwrap();
    // At 0.01 the far column needs its own center; the next radius folds it back in.
    assert_eq!(state.centers().len(), 1);
    assert_eq!(state.termination(), Termination::Covered);

    let state = model.merge_batch(state, &cluster, 1.0).unwrap();
    assert_eq!(state.centers().len(), 1);
    assert!(state.unclustered().is_empty());
    assert_eq!(state.termination(), Termination::Covered);
}

#[test]
fn same_cluster_streamed_twice_with_wide_coverage() {
    let cluster: Vec<Point> = (0..10)
        .map(|i| Point::new(1.0 + (i % 5) as f64 * 0.01, 1.0 + (i / 5) as f64 * 0.01))
        .collect();
    let model = StreamingKCenter::new(1, 0).with_scale(16.0);

    let state = model
        .merge_batch(ClusteringResult::empty(0.01), &cluster, 1.0)
        .unwrap();
    assert_eq!(state.radius(), 0.01);
    let state = model.merge_batch(state, &cluster, 1.0).unwrap();

    assert_eq!(state.centers().len(), 1);
    assert!(state.unclustered().is_empty());
    assert_eq!(state.radius(), 0.01);
}

#[test]
fn far_supports_conflict_and_evict_the_later_center() {
    let radius = 1.0;
    let a = Center {
        point: Point::new(0.0, 0.0),
        support: vec![Point::new(0.0, 0.0), Point::new(-1.0, 0.0)],
    };
    let b = Center {
        point: Point::new(20.0, 0.0),
        support: vec![Point::new(20.0, 0.0), Point::new(21.0, 0.0)],
    };
    assert!(check_conflict(&a, &b, 8.0 * radius, &Euclidean));

    let mut centers = vec![a.clone(), b.clone()];
    let evicted = resolve_conflicts(&mut centers, radius, &Euclidean);
    assert_eq!(centers, vec![a]);
    assert_eq!(evicted, vec![b]);
}

#[test]
fn stream_fit_end_to_end() {
    let mut data = Vec::new();
    for i in 0..12 {
        let jitter = (i % 4) as f64 * 0.05;
        data.push(Point::new(jitter, jitter).with_timestamp(i as f64));
        data.push(Point::new(30.0 + jitter, -jitter).with_timestamp(i as f64 + 0.5));
    }
    let state = StreamingKCenter::new(2, 1)
        .with_seed(7)
        .with_batch_size(6)
        .fit(&data)
        .unwrap();

    assert!(state.is_resolved());
    assert!(state.all_centers().len() <= 2);
    let assignment = state.assign(&data, 4.0, &Euclidean);
    let claimed: usize = assignment.clusters.iter().map(Vec::len).sum();
    assert!(assignment.unassigned.len() <= 1);
    assert_eq!(claimed + assignment.unassigned.len(), data.len());
}

#[test]
fn too_small_sample_is_an_error() {
    let data = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    let err = KCenter::new(1, 0).fit(&data).unwrap_err();
    assert!(matches!(err, Error::InsufficientSample { found: 2, .. }));
}

#[cfg(feature = "serde")]
#[test]
fn streaming_state_survives_persistence() {
    let data: Vec<Point> = (0..6).map(|i| Point::new(i as f64 * 0.1, 0.0)).collect();
    let model = StreamingKCenter::new(1, 1);
    let state = model
        .merge_batch(ClusteringResult::empty(0.1), &data[..3], 5.0)
        .unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let restored: ClusteringResult = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    let a = model.merge_batch(state, &data[3..], 5.0).unwrap();
    let b = model.merge_batch(restored, &data[3..], 5.0).unwrap();
    assert_eq!(a, b);
}
