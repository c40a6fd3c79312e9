use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use hrsw::Stopwatch;
use human_duration::human_duration;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use statesearch::problems::sliding_tile::Board;
use statesearch::problems::sliding_tile::ManhattanDistance;
use statesearch::problems::sliding_tile::Move;
use statesearch::problems::sliding_tile::SlidingTileCost;
use statesearch::problems::sliding_tile::SlidingTileProblem;
use statesearch::problems::sliding_tile::SlidingTileSpace;
use statesearch::search::AStarSearch;
use statesearch::search::BreadthFirstSearch;

const SCRAMBLE_MOVES: [usize; 3] = [10, 20, 40];
/// Maximum time willing to wait for a single benchmark instance.
/// Experiments are carried out at least 5s and at least 100 times, so running a
/// 1s instance takes 1m40s.
const MAX_INSTANCE_TIME: Duration = Duration::from_secs(1);

fn breadth_first(problem: SlidingTileProblem) -> usize {
    let mut search = BreadthFirstSearch::<
        SlidingTileProblem,
        SlidingTileSpace,
        Board,
        Move,
        SlidingTileCost,
    >::breadth_first(problem)
    .unwrap();
    search.run().path().map_or(0, |p| p.len())
}

fn astar(problem: SlidingTileProblem, heuristic: ManhattanDistance) -> usize {
    let mut search = AStarSearch::<
        SlidingTileProblem,
        ManhattanDistance,
        SlidingTileSpace,
        Board,
        Move,
        SlidingTileCost,
    >::astar(problem, heuristic)
    .unwrap();
    search.run().path().map_or(0, |p| p.len())
}

fn compare_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("8-puzzle Search");
    let goal = Board::solved(3).unwrap();

    for moves in SCRAMBLE_MOVES {
        for i in 0..3 {
            let instance_name = format!("scramble[{moves}]:{i}");
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            let start = goal.scramble(&mut rng, moves);
            let problem = SlidingTileProblem::new(start, goal.clone()).unwrap();

            let mut stopwatch = Stopwatch::new_started();
            let length = breadth_first(problem.clone());
            stopwatch.stop();
            let elapsed = stopwatch.elapsed();
            println!("{instance_name}: {length} moves");

            let heuristic = ManhattanDistance::for_problem(&problem);
            group.bench_with_input(BenchmarkId::new("A*", &instance_name), &problem, |b, p| {
                b.iter(|| astar(p.clone(), heuristic.clone()))
            });
            if elapsed > MAX_INSTANCE_TIME {
                log::warn!(
                    "Skipping breadth-first on {instance_name} as it takes too long ({})",
                    human_duration(&elapsed)
                );
                continue;
            }
            group.bench_with_input(
                BenchmarkId::new("Breadth-first", &instance_name),
                &problem,
                |b, p| b.iter(|| breadth_first(p.clone())),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, compare_search);
criterion_main!(benches);
