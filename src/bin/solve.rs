use std::path::PathBuf;
use std::time::Duration;

use anstream::println;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use tracing_subscriber::filter::LevelFilter;

use statesearch::error::SearchError;
use statesearch::float_cost::FloatCost;
use statesearch::problem::Heuristic;
use statesearch::problem::Problem;
use statesearch::problem::ZeroHeuristic;
use statesearch::problems::graph::GraphProblem;
use statesearch::problems::graph::HeuristicTable;
use statesearch::problems::graph::Vertex;
use statesearch::problems::graph::WeightedGraph;
use statesearch::problems::sliding_tile::Board;
use statesearch::problems::sliding_tile::ManhattanDistance;
use statesearch::problems::sliding_tile::MisplacedTiles;
use statesearch::problems::sliding_tile::SlidingTileProblem;
use statesearch::search::Expansion;
use statesearch::search::SearchMode;
use statesearch::search::SearchOutcome;
use statesearch::search::SearchReport;
use statesearch::search::solve;
use statesearch::search::solve_with_observer;
use statesearch::space::Action;
use statesearch::space::Cost;
use statesearch::space::Space;
use statesearch::space::State;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

type GraphCost = FloatCost<f64>;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = statesearch::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// More logging, `-v` for search summaries and `-vv` for every expansion
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve a sliding-tile puzzle
    Puzzle(PuzzleArgs),
    /// Find a path between two vertices of a weighted graph
    Graph(GraphArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PuzzleHeuristic {
    Manhattan,
    Misplaced,
    Zero,
}

#[derive(clap::Args, Debug)]
pub struct PuzzleArgs {
    /// Start board, like "1,2,3;4,0,5;6,7,8" (`0` or `_` is the blank)
    #[arg(long, required_unless_present = "scramble", conflicts_with = "scramble")]
    pub start: Option<Board>,
    /// Goal board, the solved board by default
    #[arg(long)]
    pub goal: Option<Board>,

    /// Start from the goal scrambled with this many random moves
    #[arg(long)]
    pub scramble: Option<usize>,
    /// Side of the scrambled board, when no goal is given
    #[arg(long, default_value_t = 3usize)]
    pub side: usize,
    #[arg(long, default_value_t = 0u64)]
    pub seed: u64,

    #[arg(short, long, env = "SOLVE_MODE", value_enum, default_value = "astar")]
    pub mode: SearchMode,
    #[arg(long, env = "SOLVE_PUZZLE_HEURISTIC", value_enum, default_value = "manhattan")]
    pub heuristic: PuzzleHeuristic,
    /// Print every expanded board
    #[arg(long)]
    pub trace: bool,
}

#[derive(clap::Args, Debug)]
pub struct GraphArgs {
    /// Edge list, like "A-B:10, A-C:15, B>D:12"
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub edges: Option<String>,
    /// File with an edge list, one or more edges per line
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub goal: String,

    /// Per-vertex estimates, like "A:7,B:6,C:2"
    #[arg(long, env = "SOLVE_GRAPH_HEURISTIC")]
    pub heuristic: Option<String>,
    #[arg(short, long, env = "SOLVE_MODE", value_enum, default_value = "astar")]
    pub mode: SearchMode,
    /// Print every expanded vertex
    #[arg(long)]
    pub trace: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs a search, optionally printing every expansion with `render`.
fn run<P, H, Sp, St, A, C, R>(
    problem: P,
    heuristic: H,
    mode: SearchMode,
    trace: bool,
    render: R,
) -> Result<(SearchReport<St, A, C>, Duration), SearchError>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
    R: Fn(&St) -> String,
{
    log::info!("Solving with {mode}");
    let mut stopwatch = Stopwatch::new_started();
    let report = if trace {
        solve_with_observer(problem, heuristic, mode, |s: &St, e: &Expansion<C>| {
            println!(
                "{} g={} h={} f={} |open|={}\n{}",
                format!("#{}", e.step).dimmed(),
                e.g,
                e.h,
                e.f,
                e.frontier_len,
                render(s)
            );
        })?
    } else {
        solve(problem, heuristic, mode)?
    };
    stopwatch.stop();
    Ok((report, stopwatch.elapsed()))
}

fn print_report<St, A, C>(
    report: &SearchReport<St, A, C>,
    elapsed: Duration,
    render: impl Fn(&St) -> String,
    describe: impl Fn(&A) -> String,
) where
    St: State,
    A: Action,
    C: Cost,
{
    match &report.outcome {
        SearchOutcome::Found(path) => {
            log::debug!("Found {path}");
            println!("{}\n{}", "Start".bold(), render(&path.start));
            for (i, step) in path.steps.iter().enumerate() {
                println!(
                    "{} {} {}\n{}",
                    format!("{:>3}.", i + 1).dimmed(),
                    describe(&step.action).cyan(),
                    format!("(cost {})", step.cost).dimmed(),
                    render(&step.state)
                );
            }
            println!(
                "{} {} in {} steps",
                "Cost:".green().bold(),
                path.cost,
                path.len()
            );
        }
        SearchOutcome::Exhausted => {
            println!("{}", "No path found.".red().bold());
        }
    }
    println!("{} {}", "Search:".bold(), report.mode);
    println!("{} {}", "Stats:".bold(), report.stats);
    println!("{} {}", "Elapsed:".bold(), human_duration(&elapsed));
}

fn solve_puzzle(args: PuzzleArgs) -> std::io::Result<()> {
    let goal = match (&args.goal, &args.start) {
        (Some(goal), _) => goal.clone(),
        (None, Some(start)) => Board::solved(start.side()).map_err(std::io::Error::other)?,
        (None, None) => Board::solved(args.side).map_err(std::io::Error::other)?,
    };
    let start = match args.start {
        Some(start) => start,
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            goal.scramble(&mut rng, args.scramble.unwrap_or_default())
        }
    };

    let problem = SlidingTileProblem::new(start, goal.clone()).map_err(std::io::Error::other)?;
    if !problem.is_solvable() {
        log::warn!("The goal can't be reached from the start");
        println!(
            "{}",
            "Unsolvable instance, the search will exhaust every reachable board.".yellow()
        );
    }
    println!("{}\n{}", "Goal".bold(), goal);

    let render = |b: &Board| b.to_string();
    let (report, elapsed) = match args.heuristic {
        PuzzleHeuristic::Manhattan => {
            let heuristic = ManhattanDistance::for_problem(&problem);
            run(problem, heuristic, args.mode, args.trace, render)
        }
        PuzzleHeuristic::Misplaced => {
            let heuristic = MisplacedTiles::for_problem(&problem);
            run(problem, heuristic, args.mode, args.trace, render)
        }
        PuzzleHeuristic::Zero => run(problem, ZeroHeuristic, args.mode, args.trace, render),
    }
    .map_err(std::io::Error::other)?;

    print_report(&report, elapsed, render, |m| format!("blank {m}"));
    Ok(())
}

fn solve_graph(args: GraphArgs) -> std::io::Result<()> {
    let edges = match (args.edges, &args.file) {
        (Some(edges), _) => edges,
        (None, Some(file)) => std::fs::read_to_string(file)?,
        (None, None) => String::new(),
    };
    let graph: WeightedGraph<GraphCost> = edges.parse().map_err(std::io::Error::other)?;
    log::debug!(
        "Graph with {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    let heuristic = match &args.heuristic {
        Some(table) => HeuristicTable::parse(&graph, table),
        None => Ok(HeuristicTable::new(&graph)),
    }
    .map_err(std::io::Error::other)?;
    let problem =
        GraphProblem::new(graph.clone(), &args.start, &args.goal).map_err(std::io::Error::other)?;

    let render = |v: &Vertex| graph.label(*v).to_string();
    let (report, elapsed) = run(problem, heuristic, args.mode, args.trace, render)
        .map_err(std::io::Error::other)?;

    print_report(&report, elapsed, render, |e| {
        let edge = graph.edge(*e);
        format!("{} -> {} ({})", graph.label(edge.from), graph.label(edge.to), edge.weight)
    });
    Ok(())
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    args.color.write_global();
    init_logging(args.verbose);

    match args.command {
        Command::Puzzle(puzzle) => solve_puzzle(puzzle),
        Command::Graph(graph) => solve_graph(graph),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn heuristic_env_vars_are_per_subcommand() {
        let command = Args::command();
        let env = |subcommand: &str| {
            command
                .find_subcommand(subcommand)
                .and_then(|s| s.get_arguments().find(|a| a.get_id() == "heuristic"))
                .and_then(|a| a.get_env())
                .map(|e| e.to_string_lossy().into_owned())
        };
        assert_eq!(env("puzzle").as_deref(), Some("SOLVE_PUZZLE_HEURISTIC"));
        assert_eq!(env("graph").as_deref(), Some("SOLVE_GRAPH_HEURISTIC"));
    }
}
