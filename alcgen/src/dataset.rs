/*!

Persisted dataset layout:

```text
<target>/<depth>/<instance>/{open,open_minimized,closed,closed_minimized}.owl
```

Every variant of one instance starts from the same generated skeleton. Files
that already exist are kept, so an interrupted run can be resumed; when all
four variants of an instance exist the generation itself is skipped.

*/

use crate::{configuration::DatasetConfiguration, manchester::to_manchester};
use alcgen_lib::api::{close_skeleton, minimize_skeleton, Generator, RandomGuide, Skeleton};
use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::info;

/// The guide seed for one instance, combined from the configured components;
/// `None` (unseeded) only when all three components are absent.
pub fn compute_seed(configuration: &DatasetConfiguration, depth: u32, instance: u32) -> Option<u64> {
  if configuration.seed_depth.is_none()
    && configuration.seed_instance.is_none()
    && configuration.seed_const.is_none()
  {
    return None;
  }
  let mut seed = configuration.seed_const.unwrap_or(0);
  seed = seed.wrapping_add(configuration.seed_depth.unwrap_or(0).wrapping_mul(u64::from(depth)));
  seed = seed.wrapping_add(configuration.seed_instance.unwrap_or(0).wrapping_mul(u64::from(instance)));
  Some(seed)
}

fn save(path: &Path, configuration: &DatasetConfiguration, skeleton: &Skeleton) -> Result<()> {
  let mut file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
  to_manchester(&skeleton.to_ast(), &configuration.prefix, &mut file)
    .with_context(|| format!("writing {}", path.display()))
}

pub fn create_dataset(configuration: &DatasetConfiguration, target: &Path) -> Result<()> {
  fs::create_dir_all(target).with_context(|| format!("creating {}", target.display()))?;
  for depth in configuration.min_depth..=configuration.max_depth {
    for instance in 0..configuration.n_instances {
      let instance_dir = target.join(depth.to_string()).join(instance.to_string());
      fs::create_dir_all(&instance_dir)
        .with_context(|| format!("creating {}", instance_dir.display()))?;

      let open_path = instance_dir.join("open.owl");
      let open_minimized_path = instance_dir.join("open_minimized.owl");
      let closed_path = instance_dir.join("closed.owl");
      let closed_minimized_path = instance_dir.join("closed_minimized.owl");

      let save_open = configuration.save_open && !open_path.exists();
      let save_open_minimized = configuration.save_open_minimized && !open_minimized_path.exists();
      let save_closed = configuration.save_closed && !closed_path.exists();
      let save_closed_minimized =
        configuration.save_closed_minimized && !closed_minimized_path.exists();
      if !(save_open || save_open_minimized || save_closed || save_closed_minimized) {
        continue;
      }

      info!(depth, instance, "generating instance");
      let seed = compute_seed(configuration, depth, instance);
      let mut guide = RandomGuide::from_seed(
        seed,
        configuration.guide.clone().unwrap_or_default(),
        configuration.universal_guide.clone(),
      );
      let mut skeleton = Generator::new().generate(depth, &mut guide);

      if save_open {
        save(&open_path, configuration, &skeleton)?;
      }
      if save_open_minimized {
        let mut minimized = skeleton.clone();
        minimize_skeleton(&mut minimized, true);
        save(&open_minimized_path, configuration, &minimized)?;
      }
      if save_closed || save_closed_minimized {
        close_skeleton(&mut skeleton)
          .with_context(|| format!("closing instance {instance} at depth {depth}"))?;
        if save_closed {
          save(&closed_path, configuration, &skeleton)?;
        }
        if save_closed_minimized {
          minimize_skeleton(&mut skeleton, false);
          save(&closed_minimized_path, configuration, &skeleton)?;
        }
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seed_configuration(
    seed_depth: Option<u64>,
    seed_instance: Option<u64>,
    seed_const: Option<u64>,
  ) -> DatasetConfiguration {
    DatasetConfiguration { seed_depth, seed_instance, seed_const, ..Default::default() }
  }

  #[test]
  fn seed_combines_all_three_components() {
    let configuration = seed_configuration(Some(3), Some(5), Some(100));
    assert_eq!(compute_seed(&configuration, 2, 7), Some(100 + 3 * 2 + 5 * 7));
  }

  #[test]
  fn missing_components_count_as_zero() {
    let configuration = seed_configuration(None, Some(5), None);
    assert_eq!(compute_seed(&configuration, 4, 3), Some(15));
    let configuration = seed_configuration(Some(3), None, None);
    assert_eq!(compute_seed(&configuration, 4, 3), Some(12));
    let configuration = seed_configuration(None, None, Some(9));
    assert_eq!(compute_seed(&configuration, 4, 3), Some(9));
  }

  #[test]
  fn fully_unseeded_configuration_yields_no_seed() {
    let configuration = seed_configuration(None, None, None);
    assert_eq!(compute_seed(&configuration, 4, 3), None);
  }

  fn small_configuration() -> DatasetConfiguration {
    use alcgen_lib::api::RandomGuideConfiguration;
    DatasetConfiguration {
      max_depth: 1,
      n_instances: 2,
      // Two conjuncts everywhere keep every draw closable.
      guide: Some(RandomGuideConfiguration {
        conjuncts_low: 2,
        conjuncts_high: 2,
        ..Default::default()
      }),
      ..Default::default()
    }
  }

  #[test]
  fn dataset_layout_is_complete() {
    let target = tempfile::tempdir().unwrap();
    create_dataset(&small_configuration(), target.path()).unwrap();
    for depth in 0..=1 {
      for instance in 0..2 {
        let dir = target.path().join(depth.to_string()).join(instance.to_string());
        for name in ["open.owl", "open_minimized.owl", "closed.owl", "closed_minimized.owl"] {
          assert!(dir.join(name).is_file(), "missing {name} at depth {depth}");
        }
      }
    }
  }

  #[test]
  fn seeded_datasets_are_reproducible() {
    let configuration = small_configuration();
    let one = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    create_dataset(&configuration, one.path()).unwrap();
    create_dataset(&configuration, other.path()).unwrap();
    let file = |root: &Path| fs::read_to_string(root.join("1").join("1").join("closed.owl")).unwrap();
    assert_eq!(file(one.path()), file(other.path()));
  }

  #[test]
  fn existing_files_are_kept() {
    let target = tempfile::tempdir().unwrap();
    let configuration = small_configuration();
    let marker = target.path().join("0").join("0");
    fs::create_dir_all(&marker).unwrap();
    fs::write(marker.join("open.owl"), "sentinel").unwrap();
    create_dataset(&configuration, target.path()).unwrap();
    assert_eq!(fs::read_to_string(marker.join("open.owl")).unwrap(), "sentinel");
    // The other variants of that instance are still produced.
    assert!(marker.join("closed.owl").is_file());
  }
}
