/*!

A `Descriptor` is a structural fingerprint of a skeleton subtree: the number
of conjuncts at the top plus the sorted descriptors of all children, keyed by
role for the restrictions. Concrete class identities do not enter, so two
subtrees have equal descriptors exactly when they are equal up to a renaming
of their atoms. The minimisation pass uses this to find sibling subtrees
that renaming could accidentally make equivalent.

*/

use crate::RoleId;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Descriptor {
  conjunct_count: usize,
  disjuncts:      Vec<Descriptor>,
  existential:    Vec<(RoleId, Descriptor)>,
  universal:      Vec<(RoleId, Descriptor)>,
}

impl Descriptor {
  pub(crate) fn new(
    conjunct_count: usize,
    disjuncts: Vec<Descriptor>,
    existential: Vec<(RoleId, Descriptor)>,
    universal: Vec<(RoleId, Descriptor)>,
  ) -> Self {
    debug_assert!(disjuncts.is_sorted());
    debug_assert!(existential.is_sorted());
    debug_assert!(universal.is_sorted());
    Descriptor { conjunct_count, disjuncts, existential, universal }
  }

  pub fn conjunct_count(&self) -> usize {
    self.conjunct_count
  }
}
