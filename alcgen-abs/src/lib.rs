/*!

Types/type aliases that abstract over the implementing backing type.

The generator promises that one run is a deterministic function of the
requested depth and the guide. Iteration order of every container that feeds
an algorithmic decision therefore matters, which is why the `Map` and `Set`
aliases below are backed by the ordered B-tree collections rather than the
hashed ones. Swapping the backing type is a one-line change here, provided
the replacement still iterates in a stable order.

The same idea applies to the other re-exports: the rest of the workspace
names `alcgen_abs::tracing` and `alcgen_abs::SmallVec` rather than the
implementing crates.

*/

mod cooccurrences;

pub use std::collections::{BTreeMap, BTreeSet};

/// Ordered map used everywhere determinism matters.
pub type Map<K, V> = BTreeMap<K, V>;
/// Ordered set used everywhere determinism matters.
pub type Set<T> = BTreeSet<T>;

// For vectors that are expected to have few elements.
pub use smallvec::{smallvec, SmallVec};

// Logging
pub use tracing;

pub use cooccurrences::Cooccurrences;
