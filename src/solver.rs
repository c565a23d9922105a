use crate::config::{Algorithm, SolverConfig};
use crate::error::{Result, SteinerError};
use crate::graph::{Graph, Label};
use crate::shortest_paths::ShortestPathMatrix;
use crate::steiner_tree::builder::TreeBuilder;
use crate::steiner_tree::candidates::CandidateSpace;
use crate::steiner_tree::dreyfus_wagner;
use crate::steiner_tree::parallel::ParallelSearch;
use crate::steiner_tree::search::ExactSearch;
use crate::steiner_tree::tree::{EdgeTree, SteinerTree};
use std::num::NonZeroUsize;
use tracing::{debug, info, instrument};

/// Compute a minimum-weight Steiner tree connecting `terminals`.
///
/// Graph and terminals are validated before any search work starts. The
/// returned tree is exact; if a parallel worker fails the solve fails too.
#[instrument(
    skip_all,
    fields(nodes = graph.num_nodes(), algorithm = ?config.algorithm, parallel = config.parallel)
)]
pub fn solve<V, I>(graph: &Graph<V>, terminals: I, config: &SolverConfig) -> Result<SteinerTree<V>>
where
    V: Label,
    I: IntoIterator<Item = V>,
{
    let terminals = graph.terminal_set(terminals)?;
    let tree = match config.algorithm {
        Algorithm::Exhaustive => {
            let space = CandidateSpace::new(graph, &terminals)?;
            debug!(
                terminals = terminals.len(),
                candidates = space.candidates().len(),
                subsets = space.len(),
                "search space"
            );
            let shortest_paths = ShortestPathMatrix::new(graph);
            let builder = TreeBuilder::new(&shortest_paths);
            let search = ExactSearch::new(&space, builder);
            let outcome = if config.parallel {
                ParallelSearch::new(search, config.effective_workers()).run()?
            } else {
                search.run()
            };
            let best = outcome.best.ok_or_else(|| {
                SteinerError::InvalidGraph("no candidate subset connects the terminals".into())
            })?;
            info!(
                weight = ?best.weight,
                subset = best.subset.index,
                evaluated = outcome.stats.evaluated,
                pruned = outcome.stats.pruned,
                "exhaustive search done"
            );
            let closure = builder.closure_edges(&space.subset_nodes(best.subset));
            EdgeTree::realize(graph, &shortest_paths, &closure, &terminals)
        }
        Algorithm::DreyfusWagner => {
            let shortest_paths = ShortestPathMatrix::new(graph);
            dreyfus_wagner::solve(graph, &shortest_paths, &terminals)?
        }
    };
    let tree = SteinerTree::from_edge_tree(graph, &tree);
    info!(weight = tree.weight(), edges = tree.edges().len(), "steiner tree found");
    Ok(tree)
}

/// Sequential subset search.
pub fn exhaustive_search<V, I>(graph: &Graph<V>, terminals: I) -> Result<SteinerTree<V>>
where
    V: Label,
    I: IntoIterator<Item = V>,
{
    solve(graph, terminals, &SolverConfig::sequential())
}

/// Subset search split across `workers` threads, or the available hardware concurrency.
pub fn parallel_exhaustive_search<V, I>(
    graph: &Graph<V>,
    terminals: I,
    workers: Option<NonZeroUsize>,
) -> Result<SteinerTree<V>>
where
    V: Label,
    I: IntoIterator<Item = V>,
{
    let config = SolverConfig {
        workers,
        ..SolverConfig::parallel()
    };
    solve(graph, terminals, &config)
}

/// Dreyfus-Wagner Algorithm for finding a minimal Steiner tree.
pub fn dreyfus_wagner<V, I>(graph: &Graph<V>, terminals: I) -> Result<SteinerTree<V>>
where
    V: Label,
    I: IntoIterator<Item = V>,
{
    solve(
        graph,
        terminals,
        &SolverConfig::sequential().with_algorithm(Algorithm::DreyfusWagner),
    )
}
