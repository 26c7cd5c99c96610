/*!

The closing pass: choose a negation partner for enough atoms that every
conjunctive path through the leaf model carries a direct contradiction,
which renders the whole expression unsatisfiable.

Under ALC semantics a leaf's own atoms, the conjuncts shared from its
enclosing disjunction context, and the atoms propagated from linked
universal restrictions are all asserted for the same individual; negating
one of them against any other member of that collective set closes the
leaf. Disjunction nodes need every alternative closed, conjunction nodes
just one — the pass prefers the deepest alternative, a heuristic with no
optimality guarantee.

*/

use crate::{
  api::GenerateError,
  core::leaf::{Leaf, LeafTree},
  Mapping,
};
use alcgen_abs::{Map, Set};
use tracing::trace;

/// Computes a mapping that closes the leaf model, or fails if some leaf has
/// no candidate partner left.
pub fn closing_mapping(leaves: &LeafTree) -> Result<Mapping, GenerateError> {
  let mut state = State { mapping: Mapping::new(), used: Map::new() };
  if state.close(leaves) {
    Ok(state.mapping)
  } else {
    Err(GenerateError::ClosingFailed)
  }
}

struct State {
  mapping: Mapping,
  /// How often each partner has been chosen so far; spreading partners keeps
  /// later minimisation from collapsing the formula onto one symbol pair.
  used: Map<i32, u32>,
}

impl State {
  fn close(&mut self, tree: &LeafTree) -> bool {
    match tree {
      // Every disjunctive alternative must be contradictory.
      LeafTree::Or { children, .. } => children.iter().all(|child| self.close(child)),
      // One contradictory conjunct suffices; try the deepest children only.
      LeafTree::And { children, .. } => {
        let max_depth = children.iter().map(LeafTree::depth).max().unwrap_or(0);
        children
          .iter()
          .filter(|child| child.depth() == max_depth)
          .any(|child| self.close(child))
      }
      LeafTree::Leaf { leaf, .. } => self.close_leaf(leaf),
    }
  }

  fn close_leaf(&mut self, leaf: &Leaf) -> bool {
    if leaf.atoms.iter().any(|a| self.mapping.contains_key(&a.unsigned_abs())) {
      return true;
    }
    let Some(&victim) = leaf.atoms.first() else {
      return false;
    };
    let own_atoms: Set<i32> = leaf.atoms.iter().copied().filter(|&a| a != victim).collect();
    let partner = [&leaf.linked, &leaf.shared, &own_atoms]
      .into_iter()
      .find(|source| !source.is_empty())
      .and_then(|source| self.least_used(source));
    match partner {
      Some(partner) => {
        trace!(victim, partner, "closing leaf");
        self.mapping.insert(victim.unsigned_abs(), -partner);
        *self.used.entry(partner).or_insert(0) += 1;
        true
      }
      None => false,
    }
  }

  fn least_used(&self, source: &Set<i32>) -> Option<i32> {
    source.iter().copied().min_by_key(|candidate| self.used.get(candidate).copied().unwrap_or(0))
  }
}
