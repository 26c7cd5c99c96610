/*!

The contract between the generator and whatever decides the shape of the
tree. The random guide is one implementation; tests use deterministic ones.

All answers are validated by the generator: child depths must be strictly
below the current depth, role identities start at 1, and a disjunct count of
1 is malformed (either no disjunction or at least two alternatives).

*/

use crate::RoleId;
use alcgen_abs::Map;

pub trait Guide {
  /// How many atomic conjuncts to assert at a node of the given depth.
  fn n_conjuncts(&mut self, depth: u32, universal: bool) -> usize;

  /// How many disjunctive alternatives to attach; 0 or ≥ 2.
  fn n_disjuncts(&mut self, depth: u32, universal: bool) -> usize;

  /// Which roles get existential restrictions, and at which child depth
  /// each subtree is generated. `n_roles` is the number of role identities
  /// allocated so far.
  fn existential_roles(&mut self, depth: u32, n_roles: u32, universal: bool) -> Vec<(RoleId, u32)>;

  /// Which roles get universal restrictions. `existential_depths` maps each
  /// role to the actual depths of the existential subtrees already attached
  /// at this node, which is the basis for deciding which roles deserve a
  /// universal.
  fn universal_roles(
    &mut self,
    depth: u32,
    existential_depths: &Map<RoleId, Vec<u32>>,
    universal: bool,
  ) -> Vec<(RoleId, u32)>;
}
