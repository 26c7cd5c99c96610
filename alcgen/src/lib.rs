/*!

Frontend for the ALC expression generator: dataset configuration ingested
from JSON, the Manchester OWL syntax serializer, and the persisted dataset
layout. The engine itself lives in `alcgen-lib`; everything here is the
collaborator shell around it.

*/

pub mod configuration;
pub mod dataset;
pub mod manchester;

pub use configuration::DatasetConfiguration;
pub use dataset::{compute_seed, create_dataset};
pub use manchester::to_manchester;
