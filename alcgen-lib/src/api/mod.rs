/*!

Public surface of the engine: the expression type and its operations, the
skeleton, the guide contract with the reference random guide, and the
coordinator that wires generation, closing, and minimisation together.

*/

mod error;
mod guide;
mod random_guide;

pub use error::GenerateError;
pub use guide::Guide;
pub use random_guide::{
  ExistentialDepth,
  ForceDepth,
  RandomGuide,
  RandomGuideConfiguration,
  UniversalDepth,
};

pub use crate::core::{
  closing::closing_mapping,
  format::{FormatStyle, Formattable},
  generator::Generator,
  leaf::{Leaf, LeafTree},
  minimize::{
    compute_constraints,
    merge_constraint,
    minimizing_mapping,
    nonclosing_mapping,
    nonequivalence_constraints,
    Constraint,
  },
  skeleton::{Descriptor, NodeId, NodeList, Skeleton},
  syntax::{eq, nnf, rename, ClassExpression},
};

use tracing::debug;

/// Rewrites the skeleton so it is unsatisfiable.
pub fn close_skeleton(skeleton: &mut Skeleton) -> Result<(), GenerateError> {
  let mapping = closing_mapping(&skeleton.leaves())?;
  debug!(atoms = mapping.len(), "applying closing mapping");
  skeleton.apply_mapping(&mapping);
  Ok(())
}

/// Rewrites the skeleton onto a small symbol set. With `introduce_negations`
/// (the non-closing path) some satisfiability-preserving negations are
/// distributed first; the closed path skips that, its negations already
/// exist.
pub fn minimize_skeleton(skeleton: &mut Skeleton, introduce_negations: bool) {
  let mut dsu = skeleton.cooccurrences();
  let mut constraints = Vec::new();
  compute_constraints(skeleton, skeleton.root(), true, &mut constraints);
  debug!(constraints = constraints.len(), "merging non-equivalence constraints");
  for constraint in &constraints {
    merge_constraint(&mut dsu, constraint);
  }
  if introduce_negations {
    let negations = nonclosing_mapping(&mut dsu);
    skeleton.apply_mapping(&negations);
  }
  let mapping = minimizing_mapping(&mut dsu);
  skeleton.apply_mapping(&mapping);
}

/// Generates one expression: build the skeleton through the guide, close
/// and/or minimise it, and fold it into a class expression.
pub fn generate(
  depth: u32,
  guide: &mut dyn Guide,
  close: bool,
  minimize: bool,
) -> Result<ClassExpression, GenerateError> {
  let mut skeleton = Generator::new().generate(depth, guide);
  if close {
    close_skeleton(&mut skeleton)?;
  }
  if minimize {
    minimize_skeleton(&mut skeleton, !close);
  }
  Ok(skeleton.to_ast())
}
