/*!

Recursive skeleton construction driven by a guide.

The generator owns the two monotonic symbol counters. Class identities are
handed out once and never recycled, which is what makes every conjunct in a
freshly generated skeleton unique across the whole tree; the closing and
minimisation passes lean on that freshness.

Guide answers are validated eagerly: an out-of-contract answer (child depth
not below the parent, role identity 0, a single disjunct) is a fatal error,
not a recoverable condition.

*/

use crate::{api::Guide, core::skeleton::{NodeId, Skeleton}, RoleId};
use tracing::trace;

#[derive(Debug, Default)]
pub struct Generator {
  classes: u32,
  roles:   u32,
}

impl Generator {
  pub fn new() -> Self {
    Self::default()
  }

  fn new_class(&mut self) -> i32 {
    self.classes += 1;
    self.classes as i32
  }

  fn new_role(&mut self) -> RoleId {
    self.roles += 1;
    self.roles
  }

  /// Number of class identities handed out so far.
  pub fn class_count(&self) -> u32 {
    self.classes
  }

  /// Number of role identities handed out so far.
  pub fn role_count(&self) -> u32 {
    self.roles
  }

  pub fn generate(&mut self, depth: u32, guide: &mut dyn Guide) -> Skeleton {
    let mut skeleton = Skeleton::new();
    let root = skeleton.root();
    self.build(&mut skeleton, root, depth, guide, false, false);
    skeleton
  }

  fn build(
    &mut self,
    skeleton: &mut Skeleton,
    node: NodeId,
    depth: u32,
    guide: &mut dyn Guide,
    universal: bool,
    disjunct: bool,
  ) {
    trace!(depth, universal, disjunct, "building node");
    for _ in 0..guide.n_conjuncts(depth, universal) {
      let c = self.new_class();
      skeleton.add_conjunct(node, c);
    }

    if depth > 0 {
      for (r, d) in guide.existential_roles(depth, self.roles, universal) {
        assert!(r >= 1, "guide returned role identity 0");
        assert!(d < depth, "guide requested existential child depth {d} at depth {depth}");
        while r > self.roles {
          self.new_role();
        }
        let child = skeleton.add_node();
        self.build(skeleton, child, d, guide, false, false);
        skeleton.add_existential(node, r, child);
      }
      let depths_by_role = skeleton.existential_depths(node);
      for (r, d) in guide.universal_roles(depth, &depths_by_role, universal) {
        assert!(r >= 1, "guide returned role identity 0");
        assert!(d < depth, "guide requested universal child depth {d} at depth {depth}");
        while r > self.roles {
          self.new_role();
        }
        let child = skeleton.add_node();
        self.build(skeleton, child, d, guide, true, false);
        skeleton.add_universal(node, r, child);
      }
    }

    if !disjunct {
      let n = guide.n_disjuncts(depth, universal);
      assert!(n != 1, "guide returned a single disjunct");
      for _ in 0..n {
        let child = skeleton.add_node();
        self.build(skeleton, child, depth, guide, false, true);
        skeleton.add_disjunct(node, child);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::Guide;
  use alcgen_abs::{Map, Set};

  /// Two conjuncts everywhere, two existentials and one universal per level,
  /// two disjuncts outside universal subtrees.
  struct BaselineGuide;

  impl Guide for BaselineGuide {
    fn n_conjuncts(&mut self, _depth: u32, _universal: bool) -> usize {
      2
    }

    fn n_disjuncts(&mut self, _depth: u32, universal: bool) -> usize {
      if universal { 0 } else { 2 }
    }

    fn existential_roles(&mut self, depth: u32, _n_roles: u32, _universal: bool) -> Vec<(RoleId, u32)> {
      vec![(1, depth - 1), (1, depth - 1)]
    }

    fn universal_roles(
      &mut self,
      depth: u32,
      _existential_depths: &Map<RoleId, Vec<u32>>,
      _universal: bool,
    ) -> Vec<(RoleId, u32)> {
      vec![(1, depth - 1)]
    }
  }

  /// Class identities across the whole tree form a set: nothing is recycled.
  #[test]
  fn conjuncts_are_fresh() {
    let mut generator = Generator::new();
    let skeleton = generator.generate(3, &mut BaselineGuide);
    let mut seen: Set<u32> = Set::new();
    let mut total = 0usize;
    for id in skeleton.node_ids() {
      for c in skeleton.conjuncts(id) {
        seen.insert(c.unsigned_abs());
        total += 1;
      }
    }
    assert_eq!(seen.len(), total);
    assert_eq!(seen.len(), generator.class_count() as usize);
  }

  #[test]
  fn children_stay_strictly_below_the_requested_depth() {
    let mut generator = Generator::new();
    let skeleton = generator.generate(4, &mut BaselineGuide);
    assert_eq!(skeleton.depth(skeleton.root()), 4);
    for id in skeleton.node_ids() {
      let d = skeleton.depth(id);
      for children in skeleton.existential(id).values().chain(skeleton.universal(id).values()) {
        for child in children {
          assert!(skeleton.depth(*child) < d);
        }
      }
    }
  }

  /// Whenever a role has both kinds of children at a node, every existential
  /// child reaches every universal child through its transitive linked set.
  #[test]
  fn links_are_closed_over_shared_roles() {
    let mut generator = Generator::new();
    let skeleton = generator.generate(3, &mut BaselineGuide);
    for id in skeleton.node_ids() {
      for (r, existentials) in skeleton.existential(id) {
        let Some(universals) = skeleton.universal(id).get(r) else {
          continue;
        };
        for e in existentials {
          let mut reachable: Set<NodeId> = Set::new();
          let mut queue = vec![*e];
          while let Some(n) = queue.pop() {
            for linked in skeleton.linked(n) {
              if reachable.insert(*linked) {
                queue.push(*linked);
              }
            }
          }
          for u in universals {
            assert!(reachable.contains(u), "universal sibling not linked");
          }
        }
      }
    }
  }

  #[test]
  fn depth_zero_has_no_restrictions() {
    let mut generator = Generator::new();
    let skeleton = generator.generate(0, &mut BaselineGuide);
    let root = skeleton.root();
    assert!(skeleton.existential(root).is_empty());
    assert!(skeleton.universal(root).is_empty());
    assert_eq!(skeleton.disjuncts(root).len(), 2);
    assert_eq!(skeleton.depth(root), 0);
  }

  #[test]
  fn generation_is_deterministic_for_a_deterministic_guide() {
    let one = Generator::new().generate(3, &mut BaselineGuide);
    let other = Generator::new().generate(3, &mut BaselineGuide);
    assert_eq!(one.to_ast(), other.to_ast());
  }
}
