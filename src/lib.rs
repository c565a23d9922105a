//! Exact minimum Steiner trees in weighted undirected graphs.
//!
//! The default algorithm scores every subset of non-terminal vertices by the
//! minimum spanning tree of its shortest-path closure and keeps the lightest.
//! The subset space is an integer index range, so it splits into contiguous
//! partitions that worker threads scan independently before a final
//! min-by-weight reduction. A Dreyfus-Wagner dynamic program is available as an
//! alternative exact algorithm for graphs with few terminals.
//!
//! ```
//! use steiner_exact::{solve, Graph, SolverConfig};
//!
//! let graph = Graph::from_edges([("X", "A", 1.0), ("X", "B", 1.0), ("X", "C", 1.0)])?;
//! let tree = solve(&graph, ["A", "B", "C"], &SolverConfig::parallel())?;
//! assert_eq!(tree.weight(), 3.0);
//! # Ok::<(), steiner_exact::SteinerError>(())
//! ```

mod config;
mod error;
pub mod graph;
pub mod shortest_paths;
mod solver;
pub mod steiner_tree;
mod util;

pub use config::{Algorithm, SolverConfig};
pub use error::{Result, SteinerError};
pub use graph::{EdgeWeight, Graph, GraphBuilder, Label, NodeIndex, TerminalSet};
pub use solver::{dreyfus_wagner, exhaustive_search, parallel_exhaustive_search, solve};
pub use steiner_tree::tree::SteinerTree;
pub use util::Distance;
