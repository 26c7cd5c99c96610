use std::fmt;

/// Errors surfaced by the coordinator. Guide contract violations and
/// internal invariant breaches are programming errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
  /// The closing pass ran out of candidate partners: some leaf had neither
  /// linked nor shared context nor a second atom of its own, or every
  /// deepest conjunctive branch propagated such a failure.
  ClosingFailed,
}

impl fmt::Display for GenerateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GenerateError::ClosingFailed => write!(f, "cannot fully close the formula"),
    }
  }
}

impl std::error::Error for GenerateError {}
