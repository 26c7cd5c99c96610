/*!

A `Cooccurrences` structure is a disjoint-set union over integer symbol
identities. Two symbols end up in the same class when they have been observed
together in some conjunctive context; the minimisation pass later assigns
distinct colours within a class and is free to collapse across classes.

Keys are inserted lazily: the first reference to a key creates a singleton
class. Union by rank plus path halving keeps every operation amortised
inverse-Ackermann.

*/

use crate::{Map, Set};

#[derive(Clone, Debug, Default)]
pub struct Cooccurrences {
  parent: Map<u32, u32>,
  rank:   Map<u32, u32>,
}

impl Cooccurrences {
  pub fn new() -> Self {
    Self::default()
  }

  /// Root of `x`'s class, inserting `x` as a singleton if it is new.
  pub fn find(&mut self, x: u32) -> u32 {
    if !self.parent.contains_key(&x) {
      self.parent.insert(x, x);
      self.rank.insert(x, 0);
      return x;
    }
    let mut x = x;
    while self.parent[&x] != x {
      // Path halving: point x at its grandparent before stepping up.
      let grandparent = self.parent[&self.parent[&x]];
      self.parent.insert(x, grandparent);
      x = grandparent;
    }
    x
  }

  /// Root of `x`'s class if `x` has been seen before, without inserting it.
  pub fn find_existing(&mut self, x: u32) -> Option<u32> {
    if self.parent.contains_key(&x) {
      Some(self.find(x))
    } else {
      None
    }
  }

  pub fn union(&mut self, x: u32, y: u32) {
    self.union_many([x, y]);
  }

  /// Union the classes of all given elements.
  pub fn union_many<I>(&mut self, items: I)
  where
    I: IntoIterator<Item = u32>,
  {
    let mut items = items.into_iter();
    let Some(first) = items.next() else {
      return;
    };
    let mut y = self.find(first);
    let mut ry = self.rank[&y];
    for item in items {
      let mut x = self.find(item);
      if x == y {
        continue;
      }
      let rx = self.rank[&x];
      if rx < ry {
        // The running root keeps absorbing; ranks deliberately not swapped.
        std::mem::swap(&mut x, &mut y);
      } else if rx == ry {
        *self.rank.get_mut(&x).unwrap() += 1;
        ry = rx + 1;
      } else {
        ry = rx;
      }
      self.parent.insert(y, x);
      y = x;
    }
  }

  /// The current partition as a list of classes, ordered by smallest member.
  pub fn to_partition(&mut self) -> Vec<Set<u32>> {
    let keys: Vec<u32> = self.parent.keys().copied().collect();
    let mut classes: Map<u32, Set<u32>> = Map::new();
    for x in keys {
      let root = self.find(x);
      classes.entry(root).or_default().insert(x);
    }
    let mut result: Vec<Set<u32>> = classes.into_values().collect();
    result.sort_by_key(|class| *class.first().unwrap());
    result
  }

  /// True iff some element of `xs` and some element of `ys` share a class.
  /// Elements that have never been seen are ignored.
  pub fn has_nonempty_intersection<I, J>(&mut self, xs: I, ys: J) -> bool
  where
    I: IntoIterator<Item = u32>,
    J: IntoIterator<Item = u32>,
  {
    let y_roots: Set<u32> = ys.into_iter().filter_map(|y| self.find_existing(y)).collect();
    if y_roots.is_empty() {
      return false;
    }
    xs.into_iter()
      .filter_map(|x| self.find_existing(x))
      .any(|root| y_roots.contains(&root))
  }

  /// The largest key ever inserted.
  pub fn max_key(&self) -> Option<u32> {
    self.parent.keys().next_back().copied()
  }

  /// Every key ever inserted, in ascending order.
  pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
    self.parent.keys().copied()
  }

  pub fn is_empty(&self) -> bool {
    self.parent.is_empty()
  }
}
