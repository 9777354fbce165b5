//! Offline and streaming k-center on a small geolocated event set.
//!
//! Run with `RUST_LOG=kcenter=debug` to watch the radius epochs.

use kcenter::{ClusteringResult, Euclidean, KCenter, Point, StreamingKCenter};
use tracing_subscriber::EnvFilter;

fn main() -> kcenter::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // (timestamp, longitude, latitude) around three cities, plus one stray event.
    let raw: Vec<(f64, f64, f64)> = vec![
        (0.0, 2.35, 48.85),
        (1.0, 13.40, 52.52),
        (2.0, -0.12, 51.50),
        (3.0, 2.36, 48.86),
        (4.0, 13.41, 52.51),
        (5.0, -0.13, 51.51),
        (6.0, 2.34, 48.84),
        (7.0, 13.39, 52.53),
        (8.0, -0.11, 51.49),
        (9.0, 2.37, 48.87),
        (10.0, 13.42, 52.50),
        (11.0, -0.14, 51.52),
        (12.0, -73.98, 40.75),
    ];
    let events: Vec<Point> = raw.into_iter().map(Point::from).collect();

    // --- Offline (k=3, one outlier) ---
    let solution = KCenter::new(3, 1).with_seed(42).fit(&events)?;
    println!("=== offline (k=3, z=1) radius {:.3} ===", solution.radius);
    for (center, cluster) in solution.centers.iter().zip(&solution.clusters) {
        println!(
            "  center ({:7.2}, {:6.2}) => {} events",
            center.x,
            center.y,
            cluster.len()
        );
    }
    for p in &solution.unclustered {
        println!("  outlier ({:7.2}, {:6.2})", p.x, p.y);
    }

    // --- Streaming, batch by batch ---
    let model = StreamingKCenter::new(3, 1).with_seed(42);
    let mut state = ClusteringResult::empty(0.01);
    for (i, batch) in events.chunks(4).enumerate() {
        state = model.merge_batch(state, batch, 120.0)?;
        println!(
            "\n=== after batch {} : {:?} at radius {:.3} ===",
            i,
            state.termination(),
            state.radius()
        );
        for center in state.centers() {
            println!(
                "  center ({:7.2}, {:6.2}) support {}",
                center.point.x,
                center.point.y,
                center.support.len()
            );
        }
        println!("  pending: {}", state.unclustered().len());
    }

    let assignment = state.assign(&events, 4.0, &Euclidean);
    println!("\n=== final assignment ===");
    for (i, cluster) in assignment.clusters.iter().enumerate() {
        println!("  cluster {}: {} events", i, cluster.len());
    }
    println!("  unassigned: {}", assignment.unassigned.len());

    Ok(())
}
