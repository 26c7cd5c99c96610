/*!

The reference random guide and its configuration.

Counts are drawn from inclusive `[low, high]` ranges. A second configuration
can be supplied for universal contexts — everything generated inside a
∀-subtree then follows it — and falls back to the primary one when absent.

The configuration deserializes from JSON with every field defaulted, so `{}`
is a complete document.

*/

use crate::{api::Guide, RoleId};
use alcgen_abs::Map;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How child depths are drawn for existential subtrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistentialDepth {
  /// Every subtree at `depth - 1`.
  #[default]
  Max,
  /// Uniform over `0..depth`.
  Uniform,
  /// Uniform draws, sorted ascending.
  Ascending,
  /// Uniform draws, sorted descending.
  Descending,
}

/// Which slot is forced to `depth - 1` when no drawn depth reaches it.
/// Absent means no forcing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceDepth {
  First,
  Last,
  Uniform,
}

/// How the child depth of a universal subtree relates to the depths of the
/// existential subtrees it constrains.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniversalDepth {
  /// The deepest existential subtree of the role.
  #[default]
  Max,
  /// Uniform up to that maximum.
  Uniform,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomGuideConfiguration {
  pub conjuncts_low:  usize,
  pub conjuncts_high: usize,

  /// Probability that a node carries a disjunction at all.
  pub disjuncts_p:    f64,
  pub disjuncts_low:  usize,
  pub disjuncts_high: usize,

  /// Role identities are drawn from `1..=n_roles`.
  pub n_roles: RoleId,

  pub existential_low:         usize,
  pub existential_high:        usize,
  pub existential_depth:       ExistentialDepth,
  pub existential_force_depth: Option<ForceDepth>,

  /// A role gets a universal restriction when it carries at least this many
  /// existential subtrees; the threshold is drawn per node. `None` disables
  /// universals entirely.
  pub universal_threshold_low:  Option<usize>,
  pub universal_threshold_high: Option<usize>,
  pub universal_depth:          UniversalDepth,
}

impl Default for RandomGuideConfiguration {
  fn default() -> Self {
    RandomGuideConfiguration {
      conjuncts_low: 1,
      conjuncts_high: 2,
      disjuncts_p: 1.0,
      disjuncts_low: 2,
      disjuncts_high: 2,
      n_roles: 1,
      existential_low: 0,
      existential_high: 2,
      existential_depth: ExistentialDepth::Max,
      existential_force_depth: Some(ForceDepth::Uniform),
      universal_threshold_low: Some(2),
      universal_threshold_high: Some(2),
      universal_depth: UniversalDepth::Max,
    }
  }
}

impl RandomGuideConfiguration {
  /// Panics on a malformed configuration; the guide contract is validated
  /// eagerly rather than at the first bad draw.
  fn validate(&self) {
    assert!(self.conjuncts_low <= self.conjuncts_high, "conjuncts_low > conjuncts_high");
    assert!(self.existential_low <= self.existential_high, "existential_low > existential_high");
    assert!((0.0..=1.0).contains(&self.disjuncts_p), "disjuncts_p outside [0, 1]");
    if self.disjuncts_p > 0.0 {
      assert!(self.disjuncts_low >= 2, "disjunct counts are 0 or at least 2");
      assert!(self.disjuncts_low <= self.disjuncts_high, "disjuncts_low > disjuncts_high");
    }
    assert!(self.n_roles >= 1, "at least one role is required");
    if let (Some(low), Some(high)) = (self.universal_threshold_low, self.universal_threshold_high) {
      assert!(low <= high, "universal_threshold_low > universal_threshold_high");
    }
  }
}

pub struct RandomGuide {
  rng:       StdRng,
  base:      RandomGuideConfiguration,
  universal: RandomGuideConfiguration,
}

impl RandomGuide {
  pub fn new(
    rng: StdRng,
    base: RandomGuideConfiguration,
    universal: Option<RandomGuideConfiguration>,
  ) -> Self {
    base.validate();
    let universal = universal.unwrap_or_else(|| base.clone());
    universal.validate();
    RandomGuide { rng, base, universal }
  }

  /// A guide over `StdRng`: seeded and reproducible when a seed is given,
  /// OS entropy otherwise.
  pub fn from_seed(
    seed: Option<u64>,
    base: RandomGuideConfiguration,
    universal: Option<RandomGuideConfiguration>,
  ) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    Self::new(rng, base, universal)
  }

  fn configuration(&self, universal: bool) -> &RandomGuideConfiguration {
    if universal {
      &self.universal
    } else {
      &self.base
    }
  }
}

impl Guide for RandomGuide {
  fn n_conjuncts(&mut self, _depth: u32, universal: bool) -> usize {
    let (low, high) = {
      let c = self.configuration(universal);
      (c.conjuncts_low, c.conjuncts_high)
    };
    self.rng.random_range(low..=high)
  }

  fn n_disjuncts(&mut self, _depth: u32, universal: bool) -> usize {
    let (p, low, high) = {
      let c = self.configuration(universal);
      (c.disjuncts_p, c.disjuncts_low, c.disjuncts_high)
    };
    if p <= 0.0 || (p < 1.0 && self.rng.random::<f64>() >= p) {
      return 0;
    }
    self.rng.random_range(low..=high)
  }

  fn existential_roles(&mut self, depth: u32, _n_roles: u32, universal: bool) -> Vec<(RoleId, u32)> {
    let configuration = self.configuration(universal).clone();
    let count = self.rng.random_range(configuration.existential_low..=configuration.existential_high);
    let mut depths: Vec<u32> = (0..count)
      .map(|_| match configuration.existential_depth {
        ExistentialDepth::Max => depth - 1,
        _ => self.rng.random_range(0..depth),
      })
      .collect();
    match configuration.existential_depth {
      ExistentialDepth::Ascending => depths.sort_unstable(),
      ExistentialDepth::Descending => {
        depths.sort_unstable();
        depths.reverse();
      }
      _ => {}
    }
    // A set that never reaches depth - 1 would shrink the tree; force one
    // slot up when the configuration asks for it.
    if let Some(force) = configuration.existential_force_depth {
      if count > 0 && !depths.contains(&(depth - 1)) {
        let slot = match force {
          ForceDepth::First => 0,
          ForceDepth::Last => count - 1,
          ForceDepth::Uniform => self.rng.random_range(0..count),
        };
        depths[slot] = depth - 1;
      }
    }
    depths
      .into_iter()
      .map(|d| (self.rng.random_range(1..=configuration.n_roles), d))
      .collect()
  }

  fn universal_roles(
    &mut self,
    _depth: u32,
    existential_depths: &Map<RoleId, Vec<u32>>,
    universal: bool,
  ) -> Vec<(RoleId, u32)> {
    let configuration = self.configuration(universal).clone();
    let (Some(low), Some(high)) = (configuration.universal_threshold_low, configuration.universal_threshold_high)
    else {
      return Vec::new();
    };
    let threshold = self.rng.random_range(low..=high);
    let mut result = Vec::new();
    for (&r, depths) in existential_depths {
      if depths.len() < threshold {
        continue;
      }
      let deepest = *depths.iter().max().expect("role entries are non-empty");
      let child_depth = match configuration.universal_depth {
        UniversalDepth::Max => deepest,
        UniversalDepth::Uniform => self.rng.random_range(0..=deepest),
      };
      result.push((r, child_depth));
    }
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn guide_with(configuration: RandomGuideConfiguration) -> RandomGuide {
    RandomGuide::from_seed(Some(0xfeed), configuration, None)
  }

  #[test]
  fn default_configuration_is_valid() {
    let mut guide = guide_with(RandomGuideConfiguration::default());
    let n = guide.n_conjuncts(1, false);
    assert!((1..=2).contains(&n));
    let d = guide.n_disjuncts(1, false);
    assert_eq!(d, 2);
  }

  #[test]
  fn configuration_deserializes_from_empty_document() {
    let configuration: RandomGuideConfiguration = serde_json::from_str("{}").unwrap();
    assert_eq!(configuration, RandomGuideConfiguration::default());
  }

  #[test]
  fn configuration_accepts_partial_documents() {
    let configuration: RandomGuideConfiguration = serde_json::from_str(
      r#"{"conjuncts_low": 2, "existential_depth": "uniform", "existential_force_depth": null,
          "universal_threshold_low": null, "universal_threshold_high": null}"#,
    )
    .unwrap();
    assert_eq!(configuration.conjuncts_low, 2);
    assert_eq!(configuration.existential_depth, ExistentialDepth::Uniform);
    assert_eq!(configuration.existential_force_depth, None);
    assert_eq!(configuration.universal_threshold_low, None);
  }

  #[test]
  fn zero_disjunct_probability_never_draws_disjuncts() {
    let mut guide = guide_with(RandomGuideConfiguration {
      disjuncts_p: 0.0,
      ..Default::default()
    });
    for depth in 0..10 {
      assert_eq!(guide.n_disjuncts(depth, false), 0);
    }
  }

  #[test]
  fn max_depth_policy_pins_children_one_below() {
    let mut guide = guide_with(RandomGuideConfiguration {
      existential_low: 3,
      existential_high: 3,
      ..Default::default()
    });
    for (r, d) in guide.existential_roles(4, 1, false) {
      assert_eq!(r, 1);
      assert_eq!(d, 3);
    }
  }

  #[test]
  fn forced_depth_guarantees_a_full_depth_slot() {
    let mut guide = guide_with(RandomGuideConfiguration {
      existential_low: 2,
      existential_high: 4,
      existential_depth: ExistentialDepth::Uniform,
      existential_force_depth: Some(ForceDepth::First),
      ..Default::default()
    });
    for _ in 0..50 {
      let roles = guide.existential_roles(5, 1, false);
      assert!(roles.iter().any(|(_, d)| *d == 4));
      assert!(roles.iter().all(|(_, d)| *d < 5));
    }
  }

  #[test]
  fn ascending_depths_are_sorted() {
    let mut guide = guide_with(RandomGuideConfiguration {
      existential_low: 4,
      existential_high: 4,
      existential_depth: ExistentialDepth::Ascending,
      existential_force_depth: None,
      ..Default::default()
    });
    for _ in 0..20 {
      let depths: Vec<u32> = guide.existential_roles(6, 1, false).into_iter().map(|(_, d)| d).collect();
      assert!(depths.is_sorted());
    }
  }

  #[test]
  fn universal_threshold_filters_roles() {
    let mut guide = guide_with(RandomGuideConfiguration::default());
    let depths = Map::from([(1, vec![2, 2]), (2, vec![1])]);
    let roles = guide.universal_roles(3, &depths, false);
    assert_eq!(roles, vec![(1, 2)]);
  }

  #[test]
  fn absent_threshold_disables_universals() {
    let mut guide = guide_with(RandomGuideConfiguration {
      universal_threshold_low: None,
      universal_threshold_high: None,
      ..Default::default()
    });
    let depths = Map::from([(1, vec![2, 2, 2])]);
    assert!(guide.universal_roles(3, &depths, false).is_empty());
  }

  #[test]
  fn seeded_guides_are_reproducible() {
    let mut one = guide_with(RandomGuideConfiguration::default());
    let mut other = guide_with(RandomGuideConfiguration::default());
    for depth in 1..6 {
      assert_eq!(one.n_conjuncts(depth, false), other.n_conjuncts(depth, false));
      assert_eq!(one.existential_roles(depth, 1, false), other.existential_roles(depth, 1, false));
    }
  }

  #[test]
  #[should_panic(expected = "disjunct counts are 0 or at least 2")]
  fn single_disjunct_configuration_is_rejected() {
    guide_with(RandomGuideConfiguration { disjuncts_low: 1, disjuncts_high: 1, ..Default::default() });
  }
}
