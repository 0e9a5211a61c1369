use ladders_game::{
    Board, Histogram, MedianMode, ResultAggregate, SeedPlan, Workload, combine, median,
    run_fixed, run_parallel,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SAMPLE_SIZE: u64 = 20_000;

#[test]
fn standard_board_median_and_mean_are_stable() {
    let mut rng = SmallRng::seed_from_u64(0xACED);
    let result = run_fixed(Board::standard(), &mut rng, SAMPLE_SIZE);

    let high = median(&result.histogram, MedianMode::High).expect("non-empty");
    assert!((31.0..=35.0).contains(&high), "median drifted: {high}");

    let mean = result.mean().expect("non-empty");
    assert!((38.5..=41.5).contains(&mean), "mean drifted: {mean:.2}");

    let shortest = result.shortest_len().expect("recorded");
    assert!(shortest >= 7, "no game can finish in fewer than 7 moves");
    assert!(result.longest_len().expect("recorded") > 150);
}

#[test]
fn extremal_traces_match_histogram_bounds() {
    let mut rng = SmallRng::seed_from_u64(0xF00D);
    let result = run_fixed(Board::standard(), &mut rng, 5_000);
    let (&min_len, _) = result.histogram.first_key_value().expect("non-empty");
    let (&max_len, _) = result.histogram.last_key_value().expect("non-empty");
    let shortest = result.shortest.as_ref().expect("recorded");
    let longest = result.longest.as_ref().expect("recorded");
    assert_eq!(shortest.len(), usize::try_from(min_len).expect("fits"));
    assert_eq!(longest.len(), usize::try_from(max_len).expect("fits"));
    assert!(shortest.is_won());
    assert!(longest.is_won());
}

#[test]
fn split_batches_combine_to_one_batch() {
    // The same stream played as one batch or as two consecutive batches
    // yields the same histogram.
    let mut whole_rng = SmallRng::seed_from_u64(99);
    let whole = run_fixed(Board::standard(), &mut whole_rng, 3_000);

    let mut split_rng = SmallRng::seed_from_u64(99);
    let first = run_fixed(Board::standard(), &mut split_rng, 1_000);
    let second = run_fixed(Board::standard(), &mut split_rng, 2_000);

    let forward = combine(first.clone(), second.clone());
    let backward = combine(second, first);
    assert_eq!(forward.histogram, whole.histogram);
    assert_eq!(backward.histogram, whole.histogram);
    assert_eq!(forward.total_trials, 3_000);
    assert_eq!(forward.shortest_len(), whole.shortest_len());
    assert_eq!(forward.longest_len(), whole.longest_len());
}

#[test]
fn grouping_of_worker_results_does_not_matter() {
    let parts: Vec<ResultAggregate> = (0..4u64)
        .map(|seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            run_fixed(Board::standard(), &mut rng, 400)
        })
        .collect();

    let sequential: ResultAggregate = parts.iter().cloned().collect();
    let tree = combine(
        combine(parts[0].clone(), parts[1].clone()),
        combine(parts[2].clone(), parts[3].clone()),
    );
    assert_eq!(sequential.histogram, tree.histogram);
    assert_eq!(sequential.total_trials, tree.total_trials);
    assert_eq!(sequential.elapsed, tree.elapsed);
    assert_eq!(sequential.shortest_len(), tree.shortest_len());
    assert_eq!(sequential.longest_len(), tree.longest_len());
}

#[test]
fn parallel_run_matches_manual_fold_of_worker_streams() {
    let parallel = run_parallel(Board::standard(), 3, Workload::Games(500), SeedPlan::Fixed(2024))
        .expect("workers succeed");

    let manual: ResultAggregate = SeedPlan::Fixed(2024)
        .worker_seeds(3)
        .into_iter()
        .map(|seed| {
            let mut rng = ladders_game::worker_rng(seed);
            run_fixed(Board::standard(), &mut rng, 500)
        })
        .collect();

    assert_eq!(parallel.histogram, manual.histogram);
    assert_eq!(parallel.total_trials, 1_500);
    let rate = parallel.rate(3).expect("time recorded");
    assert!(rate > 0.0);
}

#[test]
fn custom_board_without_ladders_is_slower_than_standard() {
    let plain = Board::plain();
    let mut rng = SmallRng::seed_from_u64(5);
    let result = run_fixed(&plain, &mut rng, 2_000);
    let plain_median = median(&result.histogram, MedianMode::MeanOfMiddle).expect("non-empty");
    // 100 squares at 3.5 per roll plus the exact-landing tail.
    assert!(plain_median > 28.0, "plain median {plain_median}");

    let empty = Histogram::new();
    assert!(median(&empty, MedianMode::High).is_err());
}
