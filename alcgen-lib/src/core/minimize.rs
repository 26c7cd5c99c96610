/*!

The minimisation pass: collapse the fresh class identities introduced during
generation into as few distinct symbols as the structure allows.

Two ingredients share the co-occurrence structure. The harvest puts all
atoms asserted for one individual into one class — those must stay pairwise
distinct. On top of that, sibling subtrees that are α-equivalent (equal
descriptors) yield *non-equivalence constraints*: pairs of conjunct sets
that must differ in at least one symbol after renaming, so structurally
identical siblings cannot become equivalent expressions. A constraint is
merged by unioning one representative of each side unless the sides already
share a class.

The final colouring assigns dense identities 1, 2, … per class, so members
of one class stay distinct while different classes are free to collapse
onto the same small integers. The result is heuristic, not minimum.

*/

use crate::{
  core::skeleton::{NodeId, Skeleton},
  Mapping,
};
use alcgen_abs::{Cooccurrences, Map, Set};
use tracing::{debug, trace};

/// A pair of conjunct sets that must not become equal under renaming.
pub type Constraint = (Set<i32>, Set<i32>);

fn count_signs(items: &Set<i32>) -> (usize, usize) {
  let positive = items.iter().filter(|&&c| c > 0).count();
  (positive, items.len() - positive)
}

/// Constraints forcing `a` and `b` apart, or empty when they already differ
/// structurally. The eager variant pushes constraints down into matching
/// children, preferring universal over existential over top-level conjunct
/// differences; the lazy variant returns the top conjunct pair immediately.
pub fn nonequivalence_constraints(skeleton: &Skeleton, a: NodeId, b: NodeId, lazy: bool) -> Vec<Constraint> {
  if skeleton.conjuncts(a).len() != skeleton.conjuncts(b).len() {
    return Vec::new();
  }
  if count_signs(skeleton.conjuncts(a)) != count_signs(skeleton.conjuncts(b)) {
    return Vec::new();
  }
  if skeleton.descriptor(a) != skeleton.descriptor(b) {
    return Vec::new();
  }
  if !lazy {
    let collections = [
      (skeleton.universal(a), skeleton.universal(b)),
      (skeleton.existential(a), skeleton.existential(b)),
    ];
    for (a_children, b_children) in collections {
      let mut result = Vec::new();
      let mut already_different = false;
      'roles: for (r, a_nodes) in a_children {
        let Some(b_nodes) = b_children.get(r) else {
          already_different = true;
          break;
        };
        if a_nodes.len() != b_nodes.len() {
          already_different = true;
          break;
        }
        for x in a_nodes {
          // `x` must be kept apart from every counterpart it could be
          // matched with under commutativity. A child that matches none of
          // them settles the pair without any constraint.
          let mut matched_any = false;
          for y in b_nodes {
            let required = nonequivalence_constraints(skeleton, *x, *y, lazy);
            if !required.is_empty() {
              result.extend(required);
              matched_any = true;
            }
          }
          if !matched_any {
            already_different = true;
            break 'roles;
          }
        }
      }
      if already_different {
        return Vec::new();
      }
      if !result.is_empty() {
        return result;
      }
    }
  }
  vec![(skeleton.conjuncts(a).clone(), skeleton.conjuncts(b).clone())]
}

/// Walks the skeleton and collects the constraints for every pair of
/// same-role siblings, existential collections before universal ones,
/// recursing into each child after its sibling pairs.
pub fn compute_constraints(skeleton: &Skeleton, id: NodeId, lazy: bool, out: &mut Vec<Constraint>) {
  let children = skeleton
    .existential(id)
    .values()
    .chain(skeleton.universal(id).values());
  for nodes in children {
    for (i, x) in nodes.iter().enumerate() {
      for y in &nodes[i + 1..] {
        out.extend(nonequivalence_constraints(skeleton, *x, *y, lazy));
      }
      compute_constraints(skeleton, *x, lazy, out);
    }
  }
}

/// Merges one constraint into the co-occurrence structure: nothing to do if
/// the sides already share a class, otherwise one representative of each
/// side is unioned so the colouring keeps them apart.
pub fn merge_constraint(dsu: &mut Cooccurrences, constraint: &Constraint) {
  let (left, right) = constraint;
  let left: Set<u32> = left.iter().map(|c| c.unsigned_abs()).collect();
  let right: Set<u32> = right.iter().map(|c| c.unsigned_abs()).collect();
  if dsu.has_nonempty_intersection(left.iter().copied(), right.iter().copied()) {
    trace!(?left, ?right, "constraint already satisfied");
    return;
  }
  let (Some(&l), Some(&r)) = (left.first(), right.first()) else {
    return;
  };
  dsu.union(l, r);
}

/// Dense colouring: keys are visited in ascending order and numbered 1, 2, …
/// within their class. Same class ⇒ distinct colours; different classes may
/// share colours.
pub fn minimizing_mapping(dsu: &mut Cooccurrences) -> Mapping {
  let keys: Vec<u32> = dsu.keys().collect();
  let mut counters: Map<u32, i32> = Map::new();
  let mut mapping = Mapping::new();
  for key in keys {
    let root = dsu.find(key);
    let counter = counters.entry(root).or_insert(1);
    mapping.insert(key, *counter);
    *counter += 1;
  }
  debug!(symbols = mapping.len(), "computed minimizing mapping");
  mapping
}

/// Negation introduction for the non-closing path: representatives of two
/// distinct classes are mapped onto each other negated and their classes
/// unioned, pair by pair. Symbols that never co-occur are safe to identify,
/// so satisfiability is preserved while negations appear in the output.
pub fn nonclosing_mapping(dsu: &mut Cooccurrences) -> Mapping {
  let partition = dsu.to_partition();
  let mut mapping = Mapping::new();
  for pair in partition.chunks_exact(2) {
    let l = *pair[0].first().expect("classes are non-empty");
    let r = *pair[1].first().expect("classes are non-empty");
    mapping.insert(l, -(r as i32));
    dsu.union(l, r);
  }
  debug!(negations = mapping.len(), "computed non-closing mapping");
  mapping
}
