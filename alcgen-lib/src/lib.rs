/*!

Random generation of class expressions in the description logic ALC, for
benchmarking ALC reasoners.

A generated expression is a tree over atomic class symbols, role symbols, and
the connectives ⊓, ⊔, ¬, ∃R.C and ∀R.C. Construction is driven by a
[`Guide`](api::Guide), which decides fan-out and nesting; the engine owns the
symbol allocation and the structural bookkeeping. Two post-processing passes
rework the generated skeleton: *closing* distributes negations so the whole
expression becomes unsatisfiable, and *minimisation* collapses the fresh
symbols into as few distinct ones as the co-occurrence structure allows.

The crate deliberately stops at the expression: serialization, configuration
files, and dataset layout live in the frontend crate.

*/

pub mod api;
mod core;

/// Role identities are dense positive integers allocated by the generator.
pub type RoleId = u32;

/// Atom rewriting map: absolute class identity → signed replacement. Applied
/// sign-preservingly, so positive and negative occurrences of one symbol are
/// rewritten together.
pub type Mapping = alcgen_abs::Map<u32, i32>;
