/*!

The mutable skeleton a generation works on before it is folded into a class
expression.

A skeleton node is a conjunction of: atomic classes (signed integers), one
subtree per ∃R.C, one subtree per ∀R.C, and optionally a disjunction of
alternative subtrees. On top of the ownership tree the skeleton keeps
`linked` back-edges: when a role carries both existential and universal
children under one parent, each existential child is linked to each of those
universal children, transitively through nested ∃/∀ pairs. A linked node is
owned by its own parent; the back-edge only propagates conjunct context into
the existential subtree, which is what lets the closing pass find
contradiction partners across the ∃/∀ interaction.

## Lifecycle and Ownership

All nodes of one skeleton live in an index arena owned by the `Skeleton`
value; a `NodeId` is an index into it. Children and `linked` entries are
both plain `NodeId`s, so back-edges cannot create ownership cycles. Nodes
are created during generation, rewritten in place by the mapping passes, and
discarded with the skeleton after the expression has been extracted.

*/

mod descriptor;

pub use descriptor::Descriptor;

use crate::{
  core::{
    format::{FormatStyle, Formattable},
    leaf::{Leaf, LeafTree},
    syntax::ClassExpression,
  },
  impl_display_debug_for_formattable,
  Mapping,
  RoleId,
};
use alcgen_abs::{Cooccurrences, Map, Set, SmallVec};
use once_cell::unsync::OnceCell;

/// Handle to a node of one particular [`Skeleton`]'s arena.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

/// Per-role child list; almost always one or two entries.
pub type NodeList = SmallVec<[NodeId; 2]>;

#[derive(Clone, Debug, Default)]
struct Node {
  conjuncts:   Set<i32>,
  disjuncts:   NodeList,
  existential: Map<RoleId, NodeList>,
  universal:   Map<RoleId, NodeList>,
  linked:      NodeList,
  descriptor:  OnceCell<Descriptor>,
}

#[derive(Clone)]
pub struct Skeleton {
  nodes: Vec<Node>,
  root:  NodeId,
}

impl Default for Skeleton {
  fn default() -> Self {
    Self::new()
  }
}

impl Skeleton {
  /// A fresh arena holding a single empty root node.
  pub fn new() -> Self {
    Skeleton { nodes: vec![Node::default()], root: NodeId(0) }
  }

  pub fn root(&self) -> NodeId {
    self.root
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
    (0..self.nodes.len()).map(NodeId)
  }

  /// Creates a fresh detached node. The caller is expected to attach it via
  /// one of the `add_*` methods once its subtree is complete.
  pub fn add_node(&mut self) -> NodeId {
    self.nodes.push(Node::default());
    NodeId(self.nodes.len() - 1)
  }

  fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.0]
  }

  fn node_mut(&mut self, id: NodeId) -> &mut Node {
    &mut self.nodes[id.0]
  }

  // region Construction

  pub fn add_conjunct(&mut self, id: NodeId, c: i32) {
    assert!(c != 0, "class identities are non-zero");
    self.node_mut(id).conjuncts.insert(c);
  }

  pub fn add_disjunct(&mut self, id: NodeId, child: NodeId) {
    self.node_mut(id).disjuncts.push(child);
  }

  /// Attaches `child` as an ∃r subtree. Universal children already present
  /// for `r` constrain `child`, so it is linked to each of them.
  pub fn add_existential(&mut self, id: NodeId, r: RoleId, child: NodeId) {
    if let Some(universals) = self.node(id).universal.get(&r) {
      for u in universals.clone() {
        self.link(child, u);
      }
    }
    self.node_mut(id).existential.entry(r).or_default().push(child);
  }

  /// Attaches `child` as a ∀r subtree, linking every existing ∃r sibling to
  /// it first.
  pub fn add_universal(&mut self, id: NodeId, r: RoleId, child: NodeId) {
    if let Some(existentials) = self.node(id).existential.get(&r) {
      for e in existentials.clone() {
        self.link(e, child);
      }
    }
    self.node_mut(id).universal.entry(r).or_default().push(child);
  }

  /// Records that `other` (a universal subtree) constrains `this` (an
  /// existential subtree), and closes the relation under nested ∃/∀ pairs:
  /// every ∃r child of `this` is linked to every ∀r child of `other`.
  fn link(&mut self, this: NodeId, other: NodeId) {
    self.node_mut(this).linked.push(other);
    for (r, universals) in self.node(other).universal.clone() {
      let existentials = self.node(this).existential.get(&r).cloned().unwrap_or_default();
      for e in existentials {
        for u in &universals {
          self.link(e, *u);
        }
      }
    }
  }

  // endregion

  // region Accessors

  pub fn conjuncts(&self, id: NodeId) -> &Set<i32> {
    &self.node(id).conjuncts
  }

  pub fn disjuncts(&self, id: NodeId) -> &[NodeId] {
    &self.node(id).disjuncts
  }

  pub fn existential(&self, id: NodeId) -> &Map<RoleId, NodeList> {
    &self.node(id).existential
  }

  pub fn universal(&self, id: NodeId) -> &Map<RoleId, NodeList> {
    &self.node(id).universal
  }

  pub fn linked(&self, id: NodeId) -> &[NodeId] {
    &self.node(id).linked
  }

  /// The node's own conjuncts plus everything propagated through `linked`.
  pub fn all_conjuncts(&self, id: NodeId) -> Set<i32> {
    let mut result = self.node(id).conjuncts.clone();
    result.extend(self.linked_conjuncts(id));
    result
  }

  /// The union of `all_conjuncts` over the node's `linked` entries.
  pub fn linked_conjuncts(&self, id: NodeId) -> Set<i32> {
    let mut result = Set::new();
    for linked in &self.node(id).linked {
      result.extend(self.all_conjuncts(*linked));
    }
    result
  }

  /// Own disjuncts followed by the disjuncts of linked universal subtrees;
  /// a linked universal's alternatives apply to this node's individual too.
  pub fn all_disjuncts(&self, id: NodeId) -> Vec<NodeId> {
    let mut result: Vec<NodeId> = self.node(id).disjuncts.to_vec();
    for linked in &self.node(id).linked {
      result.extend(self.all_disjuncts(*linked));
    }
    result
  }

  /// Own existential children merged with those of linked universal
  /// subtrees, grouped by role.
  pub fn all_existential(&self, id: NodeId) -> Map<RoleId, Vec<NodeId>> {
    let mut result: Map<RoleId, Vec<NodeId>> = self
      .node(id)
      .existential
      .iter()
      .map(|(r, nodes)| (*r, nodes.to_vec()))
      .collect();
    for linked in &self.node(id).linked {
      for (r, nodes) in self.all_existential(*linked) {
        result.entry(r).or_default().extend(nodes);
      }
    }
    result
  }

  /// Longest path through any existential or universal child, plus one; 0 at
  /// a node holding conjuncts only.
  pub fn depth(&self, id: NodeId) -> u32 {
    let node = self.node(id);
    node
      .existential
      .values()
      .chain(node.universal.values())
      .flatten()
      .map(|child| self.depth(*child) + 1)
      .max()
      .unwrap_or(0)
  }

  /// Actual depths of the existential subtrees already attached, by role.
  /// This is what the guide sees when deciding which roles get universals.
  pub fn existential_depths(&self, id: NodeId) -> Map<RoleId, Vec<u32>> {
    self
      .node(id)
      .existential
      .iter()
      .map(|(r, nodes)| (*r, nodes.iter().map(|n| self.depth(*n)).collect()))
      .collect()
  }

  /// Structural fingerprint of the subtree, invariant under renaming of
  /// class identities. Computed once per node and cached.
  pub fn descriptor(&self, id: NodeId) -> &Descriptor {
    self.node(id).descriptor.get_or_init(|| self.compute_descriptor(id))
  }

  fn compute_descriptor(&self, id: NodeId) -> Descriptor {
    let node = self.node(id);
    let mut disjuncts: Vec<Descriptor> =
      node.disjuncts.iter().map(|d| self.descriptor(*d).clone()).collect();
    disjuncts.sort();
    let mut existential: Vec<(RoleId, Descriptor)> = node
      .existential
      .iter()
      .flat_map(|(r, nodes)| nodes.iter().map(|n| (*r, self.descriptor(*n).clone())))
      .collect();
    existential.sort();
    let mut universal: Vec<(RoleId, Descriptor)> = node
      .universal
      .iter()
      .flat_map(|(r, nodes)| nodes.iter().map(|n| (*r, self.descriptor(*n).clone())))
      .collect();
    universal.sort();
    Descriptor::new(node.conjuncts.len(), disjuncts, existential, universal)
  }

  // endregion

  // region Passes

  /// Replaces every conjunct `c` whose absolute value is mapped with
  /// `sign(c) · mapping[|c|]`, in every node of the arena. Children are
  /// reached through ownership, so each node is rewritten exactly once;
  /// `linked` back-edges need no separate treatment.
  pub fn apply_mapping(&mut self, mapping: &Mapping) {
    for node in &mut self.nodes {
      node.conjuncts = node
        .conjuncts
        .iter()
        .map(|&c| match mapping.get(&c.unsigned_abs()) {
          Some(&replacement) => if c < 0 { -replacement } else { replacement },
          None => c,
        })
        .collect();
    }
  }

  /// Extracts the leaf model for the closing pass. See the `leaf` module for
  /// the depth-label convention.
  pub fn leaves(&self) -> LeafTree {
    self.leaves_at(self.root, &Set::new(), &Set::new(), 0)
  }

  fn leaves_at(&self, id: NodeId, shared: &Set<i32>, linked: &Set<i32>, depth: u32) -> LeafTree {
    let disjuncts = self.all_disjuncts(id);
    if !disjuncts.is_empty() {
      // A disjunction context is opened at most once per conjunctive path.
      assert!(
        shared.is_empty() && linked.is_empty(),
        "nested disjunction context in leaf extraction"
      );
      let own_shared = self.node(id).conjuncts.clone();
      let own_linked = self.linked_conjuncts(id);
      let children: Vec<LeafTree> = disjuncts
        .iter()
        .map(|d| self.leaves_at(*d, &own_shared, &own_linked, depth))
        .collect();
      let depth = children.iter().map(LeafTree::depth).max().unwrap_or(depth);
      return LeafTree::Or { children, depth };
    }
    let existential = self.all_existential(id);
    if !existential.is_empty() {
      let children: Vec<LeafTree> = existential
        .values()
        .flatten()
        .map(|e| self.leaves_at(*e, &Set::new(), &Set::new(), depth + 1))
        .collect();
      let depth = children.iter().map(LeafTree::depth).max().unwrap_or(depth);
      return LeafTree::And { children, depth };
    }
    let mut leaf_linked = self.linked_conjuncts(id);
    leaf_linked.extend(linked);
    LeafTree::Leaf {
      leaf: Leaf { atoms: self.node(id).conjuncts.clone(), shared: shared.clone(), linked: leaf_linked },
      depth,
    }
  }

  /// Harvests the co-occurrence structure: the absolute values of all
  /// conjuncts asserted for one individual end up in one class. Disjuncts
  /// inherit the enclosing node's batch as a prefix, and every subtree
  /// contributes its batch, universal subtrees included.
  pub fn cooccurrences(&self) -> Cooccurrences {
    let mut dsu = Cooccurrences::new();
    self.harvest(self.root, &Set::new(), &mut dsu);
    dsu
  }

  fn harvest(&self, id: NodeId, prefix: &Set<u32>, dsu: &mut Cooccurrences) {
    let mut batch: Set<u32> = self.all_conjuncts(id).iter().map(|c| c.unsigned_abs()).collect();
    batch.extend(prefix);
    dsu.union_many(batch.iter().copied());
    for d in self.all_disjuncts(id) {
      self.harvest(d, &batch, dsu);
    }
    let node = self.node(id);
    let empty = Set::new();
    for child in node.existential.values().chain(node.universal.values()).flatten() {
      self.harvest(*child, &empty, dsu);
    }
  }

  // endregion

  // region Expression extraction

  /// Folds the skeleton into a class expression. Conjuncts are ⊓-joined
  /// left-associatively, followed by the existential and universal
  /// restrictions; a disjunction, if present, is ⊔-joined and ⊓-ed in last.
  /// An empty node yields ⊤.
  pub fn to_ast(&self) -> ClassExpression {
    self.node_to_ast(self.root)
  }

  pub fn node_to_ast(&self, id: NodeId) -> ClassExpression {
    let node = self.node(id);
    let conjuncts = node.conjuncts.iter().map(|&c| {
      if c < 0 {
        ClassExpression::not(ClassExpression::atom(-c))
      } else {
        ClassExpression::atom(c)
      }
    });
    let existentials = node
      .existential
      .iter()
      .flat_map(|(r, nodes)| nodes.iter().map(|n| ClassExpression::any(*r, self.node_to_ast(*n))));
    let universals = node
      .universal
      .iter()
      .flat_map(|(r, nodes)| nodes.iter().map(|n| ClassExpression::all(*r, self.node_to_ast(*n))));
    let result = conjuncts.chain(existentials).chain(universals).reduce(ClassExpression::and);

    if node.disjuncts.is_empty() {
      return result.unwrap_or(ClassExpression::Top);
    }
    assert!(node.disjuncts.len() >= 2, "disjunct lists have length 0 or >= 2");
    let disjunction = node
      .disjuncts
      .iter()
      .map(|d| self.node_to_ast(*d))
      .reduce(ClassExpression::or)
      .expect("non-empty disjunct list");
    match result {
      Some(conjunction) => ClassExpression::and(conjunction, disjunction),
      None => disjunction,
    }
  }

  // endregion
}

impl Formattable for Skeleton {
  fn repr(&self, out: &mut dyn std::fmt::Write, style: FormatStyle) -> std::fmt::Result {
    self.to_ast().repr(out, style)
  }
}

impl_display_debug_for_formattable!(Skeleton);
