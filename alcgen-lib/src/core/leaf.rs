/*!

The leaf model consumed by the closing pass.

A `Leaf` gathers the three sets of atoms that are conjunctively asserted for
one individual of the abstract tableau: the leaf node's own conjuncts, the
conjuncts shared from an enclosing disjunction context, and the conjuncts
propagated from universal restrictions linked to the path. A `LeafTree`
mirrors the and/or structure above the leaves and carries a depth label: the
label of a leaf is its existential nesting depth, and the label of an inner
node is the deepest label below it, which is what the closing pass's
"deepest first" preference keys on.

*/

use alcgen_abs::Set;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
  pub atoms:  Set<i32>,
  pub shared: Set<i32>,
  pub linked: Set<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeafTree {
  /// Disjunctive alternatives; every child must be closed for the whole
  /// disjunction to be contradictory.
  Or { children: Vec<LeafTree>, depth: u32 },
  /// Conjunctive branches; closing any one child suffices.
  And { children: Vec<LeafTree>, depth: u32 },
  Leaf { leaf: Leaf, depth: u32 },
}

impl LeafTree {
  pub fn depth(&self) -> u32 {
    match self {
      LeafTree::Or { depth, .. } | LeafTree::And { depth, .. } | LeafTree::Leaf { depth, .. } => *depth,
    }
  }
}
