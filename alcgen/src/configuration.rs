/*!

Dataset configuration. Every field carries a default, so any subset of the
fields — including none — is a valid JSON document.

*/

use alcgen_lib::api::RandomGuideConfiguration;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfiguration {
  pub min_depth:   u32,
  pub max_depth:   u32,
  pub n_instances: u32,

  pub save_open:             bool,
  pub save_open_minimized:   bool,
  pub save_closed:           bool,
  pub save_closed_minimized: bool,

  /// Seed components. The guide seed of one instance is
  /// `seed_const + seed_depth·depth + seed_instance·instance`, with missing
  /// components treated as 0; when all three are missing the guide is
  /// unseeded.
  pub seed_depth:    Option<u64>,
  pub seed_instance: Option<u64>,
  pub seed_const:    Option<u64>,

  pub prefix: String,

  pub guide: Option<RandomGuideConfiguration>,
  /// Applied inside universal subtrees; falls back to `guide` when absent.
  pub universal_guide: Option<RandomGuideConfiguration>,
}

impl Default for DatasetConfiguration {
  fn default() -> Self {
    DatasetConfiguration {
      min_depth: 0,
      max_depth: 5,
      n_instances: 10,
      save_open: true,
      save_open_minimized: true,
      save_closed: true,
      save_closed_minimized: true,
      seed_depth: Some(0xfeed),
      seed_instance: Some(0xc00f_fee),
      seed_const: None,
      prefix: "http://example.com/foo".to_string(),
      guide: None,
      universal_guide: None,
    }
  }
}

impl DatasetConfiguration {
  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }

  pub fn from_path(path: &Path) -> io::Result<Self> {
    let contents = fs::read_to_string(path)?;
    Self::from_json(&contents).map_err(io::Error::other)
  }
}
