/*!

The ALC class expression type and the structural operations on it: negation
normal form, equality modulo commutativity of ⊓/⊔, and atom renaming.

Atomic classes are positive integers. A negated atomic class is written with
an explicit [`ClassExpression::Not`] node; the skeleton's signed-integer
convention is translated away when a skeleton is folded into an expression.

*/

use crate::{
  core::format::{FormatStyle, Formattable},
  impl_display_debug_for_formattable,
  RoleId,
};
use alcgen_abs::Map;

/// A class expression is a closed sum over the ALC connectives. Immutable
/// once built.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
  /// Atomic class. The identity is non-zero; a negative identity is the
  /// negation of the atomic class of the same absolute value.
  Atom(i32),
  Top,
  Bottom,
  Not(Box<ClassExpression>),
  And(Box<ClassExpression>, Box<ClassExpression>),
  Or(Box<ClassExpression>, Box<ClassExpression>),
  /// Existential restriction ∃R.C.
  Any(RoleId, Box<ClassExpression>),
  /// Universal restriction ∀R.C.
  All(RoleId, Box<ClassExpression>),
}

impl ClassExpression {
  pub fn atom(c: i32) -> Self {
    debug_assert!(c != 0, "class identities are non-zero");
    ClassExpression::Atom(c)
  }

  pub fn not(c: ClassExpression) -> Self {
    ClassExpression::Not(Box::new(c))
  }

  pub fn and(a: ClassExpression, b: ClassExpression) -> Self {
    ClassExpression::And(Box::new(a), Box::new(b))
  }

  pub fn or(a: ClassExpression, b: ClassExpression) -> Self {
    ClassExpression::Or(Box::new(a), Box::new(b))
  }

  pub fn any(r: RoleId, c: ClassExpression) -> Self {
    ClassExpression::Any(r, Box::new(c))
  }

  pub fn all(r: RoleId, c: ClassExpression) -> Self {
    ClassExpression::All(r, Box::new(c))
  }
}

/// Negation normal form: negations pushed down to atomic classes using De
/// Morgan, quantifier duality (¬∀R.C ↔ ∃R.¬C), double-negation elimination,
/// ¬⊤ → ⊥ and ¬⊥ → ⊤. Returns a fresh tree; idempotent.
pub fn nnf(e: &ClassExpression) -> ClassExpression {
  use ClassExpression::*;
  match e {
    Not(inner) => nnf_neg(inner),
    And(a, b) => ClassExpression::and(nnf(a), nnf(b)),
    Or(a, b) => ClassExpression::or(nnf(a), nnf(b)),
    Any(r, c) => ClassExpression::any(*r, nnf(c)),
    All(r, c) => ClassExpression::all(*r, nnf(c)),
    Atom(_) | Top | Bottom => e.clone(),
  }
}

/// The normal form of ¬e.
fn nnf_neg(e: &ClassExpression) -> ClassExpression {
  use ClassExpression::*;
  match e {
    Atom(c) => ClassExpression::not(Atom(*c)),
    Top => Bottom,
    Bottom => Top,
    Not(inner) => nnf(inner),
    And(a, b) => ClassExpression::or(nnf_neg(a), nnf_neg(b)),
    Or(a, b) => ClassExpression::and(nnf_neg(a), nnf_neg(b)),
    Any(r, c) => ClassExpression::all(*r, nnf_neg(c)),
    All(r, c) => ClassExpression::any(*r, nnf_neg(c)),
  }
}

/// Equality under NNF, modulo commutativity of ⊓ and ⊔ only. Quantifiers
/// compare the role identity exactly and recurse on the concept; atoms
/// compare by signed integer.
pub fn eq(a: &ClassExpression, b: &ClassExpression) -> bool {
  real_eq(&nnf(a), &nnf(b))
}

fn real_eq(a: &ClassExpression, b: &ClassExpression) -> bool {
  use ClassExpression::*;
  match (a, b) {
    (And(a1, a2), And(b1, b2)) | (Or(a1, a2), Or(b1, b2)) => {
      (real_eq(a1, b1) && real_eq(a2, b2)) || (real_eq(a1, b2) && real_eq(a2, b1))
    }
    (Not(x), Not(y)) => real_eq(x, y),
    (Any(r, c), Any(s, d)) | (All(r, c), All(s, d)) => r == s && real_eq(c, d),
    (Atom(x), Atom(y)) => x == y,
    (Top, Top) | (Bottom, Bottom) => true,
    _ => false,
  }
}

/// Applies a partial mapping from atom identities to atom identities. Role
/// identities are not renamed; the tree structure is preserved.
pub fn rename(e: &ClassExpression, mapping: &Map<i32, i32>) -> ClassExpression {
  use ClassExpression::*;
  match e {
    Atom(c) => Atom(mapping.get(c).copied().unwrap_or(*c)),
    Top => Top,
    Bottom => Bottom,
    Not(x) => ClassExpression::not(rename(x, mapping)),
    And(a, b) => ClassExpression::and(rename(a, mapping), rename(b, mapping)),
    Or(a, b) => ClassExpression::or(rename(a, mapping), rename(b, mapping)),
    Any(r, c) => ClassExpression::any(*r, rename(c, mapping)),
    All(r, c) => ClassExpression::all(*r, rename(c, mapping)),
  }
}

// Operator precedences for rendering; higher binds tighter.
const PREC_NOT: u8 = 50;
const PREC_QUANTIFIER: u8 = 40;
const PREC_BINARY: u8 = 30;

impl ClassExpression {
  fn repr_prec(&self, out: &mut dyn std::fmt::Write, enclosing: u8) -> std::fmt::Result {
    use ClassExpression::*;
    let own = match self {
      Not(_) => PREC_NOT,
      Any(..) | All(..) => PREC_QUANTIFIER,
      And(..) | Or(..) => PREC_BINARY,
      Atom(_) | Top | Bottom => u8::MAX,
    };
    let parenthesize = enclosing >= own && own != u8::MAX;
    if parenthesize {
      write!(out, "(")?;
    }
    match self {
      Atom(c) if *c < 0 => write!(out, "¬C{}", -c)?,
      Atom(c) => write!(out, "C{c}")?,
      Top => write!(out, "⊤")?,
      Bottom => write!(out, "⊥")?,
      Not(x) => {
        write!(out, "¬")?;
        x.repr_prec(out, own)?;
      }
      And(a, b) => {
        a.repr_prec(out, own)?;
        write!(out, " ⊓ ")?;
        b.repr_prec(out, own)?;
      }
      Or(a, b) => {
        a.repr_prec(out, own)?;
        write!(out, " ⊔ ")?;
        b.repr_prec(out, own)?;
      }
      Any(r, c) => {
        write!(out, "∃R{r}.")?;
        c.repr_prec(out, own)?;
      }
      All(r, c) => {
        write!(out, "∀R{r}.")?;
        c.repr_prec(out, own)?;
      }
    }
    if parenthesize {
      write!(out, ")")?;
    }
    Ok(())
  }
}

impl ClassExpression {
  /// Constructor-shaped rendering without precedence rules. Unlike the
  /// pretty form it keeps `Atom(-2)` and `Not(Atom(2))` apart, both of
  /// which display as `¬C2`.
  fn repr_structural(&self, out: &mut dyn std::fmt::Write) -> std::fmt::Result {
    use ClassExpression::*;
    match self {
      Atom(c) => write!(out, "Atom({c})"),
      Top => write!(out, "Top"),
      Bottom => write!(out, "Bottom"),
      Not(x) => {
        write!(out, "Not(")?;
        x.repr_structural(out)?;
        write!(out, ")")
      }
      And(a, b) | Or(a, b) => {
        write!(out, "{}(", if matches!(self, And(..)) { "And" } else { "Or" })?;
        a.repr_structural(out)?;
        write!(out, ", ")?;
        b.repr_structural(out)?;
        write!(out, ")")
      }
      Any(r, c) | All(r, c) => {
        write!(out, "{}(R{r}, ", if matches!(self, Any(..)) { "Any" } else { "All" })?;
        c.repr_structural(out)?;
        write!(out, ")")
      }
    }
  }
}

impl Formattable for ClassExpression {
  fn repr(&self, out: &mut dyn std::fmt::Write, style: FormatStyle) -> std::fmt::Result {
    match style {
      FormatStyle::Default => self.repr_prec(out, 0),
      FormatStyle::Debug => self.repr_structural(out),
    }
  }
}

impl_display_debug_for_formattable!(ClassExpression);

#[cfg(test)]
mod tests {
  use super::*;
  use ClassExpression::{Bottom, Top};

  fn a(c: i32) -> ClassExpression {
    ClassExpression::atom(c)
  }

  #[test]
  fn nnf_straight() {
    assert_eq!(nnf(&a(1)), a(1));
  }

  #[test]
  fn nnf_neg_atom() {
    assert_eq!(nnf(&ClassExpression::not(a(1))), ClassExpression::not(a(1)));
  }

  #[test]
  fn nnf_double_neg() {
    let e = ClassExpression::not(ClassExpression::not(a(1)));
    assert_eq!(nnf(&e), a(1));
  }

  #[test]
  fn nnf_triple_neg() {
    let e = ClassExpression::not(ClassExpression::not(ClassExpression::not(a(1))));
    assert_eq!(nnf(&e), ClassExpression::not(a(1)));
  }

  #[test]
  fn demorgan_and() {
    let e = ClassExpression::not(ClassExpression::and(a(1), a(2)));
    let expected = ClassExpression::or(ClassExpression::not(a(1)), ClassExpression::not(a(2)));
    assert_eq!(nnf(&e), expected);
  }

  #[test]
  fn demorgan_or() {
    let e = ClassExpression::not(ClassExpression::or(a(1), a(2)));
    let expected = ClassExpression::and(ClassExpression::not(a(1)), ClassExpression::not(a(2)));
    assert_eq!(nnf(&e), expected);
  }

  #[test]
  fn quantifier_duality() {
    let e = ClassExpression::not(ClassExpression::all(1, a(2)));
    assert_eq!(nnf(&e), ClassExpression::any(1, ClassExpression::not(a(2))));
    let e = ClassExpression::not(ClassExpression::any(1, a(2)));
    assert_eq!(nnf(&e), ClassExpression::all(1, ClassExpression::not(a(2))));
  }

  #[test]
  fn nnf_sentinels() {
    assert_eq!(nnf(&ClassExpression::not(Top)), Bottom);
    assert_eq!(nnf(&ClassExpression::not(Bottom)), Top);
  }

  #[test]
  fn nnf_rewrites_below_binary_nodes() {
    let e = ClassExpression::and(ClassExpression::not(ClassExpression::not(a(1))), a(2));
    assert_eq!(nnf(&e), ClassExpression::and(a(1), a(2)));
  }

  #[test]
  fn nnf_is_idempotent() {
    let e = ClassExpression::not(ClassExpression::and(
      ClassExpression::any(1, ClassExpression::not(ClassExpression::or(a(1), a(2)))),
      ClassExpression::all(2, ClassExpression::not(ClassExpression::not(a(3)))),
    ));
    let once = nnf(&e);
    assert_eq!(nnf(&once), once);
  }

  #[test]
  fn eq_commutative_demorgan() {
    let lhs = ClassExpression::not(ClassExpression::and(a(1), a(2)));
    assert!(eq(
      &lhs,
      &ClassExpression::or(ClassExpression::not(a(2)), ClassExpression::not(a(1)))
    ));
    assert!(!eq(
      &lhs,
      &ClassExpression::and(ClassExpression::not(a(2)), ClassExpression::not(a(1)))
    ));
    assert!(!eq(&lhs, &ClassExpression::or(a(2), ClassExpression::not(a(1)))));
  }

  #[test]
  fn eq_compares_roles_exactly() {
    assert!(eq(&ClassExpression::any(1, a(1)), &ClassExpression::any(1, a(1))));
    assert!(!eq(&ClassExpression::any(1, a(1)), &ClassExpression::any(2, a(1))));
    assert!(!eq(&ClassExpression::any(1, a(1)), &ClassExpression::all(1, a(1))));
  }

  #[test]
  fn rename_atoms_only() {
    let sigma = Map::from([(1, 3)]);
    assert_eq!(
      rename(&ClassExpression::and(a(1), a(2)), &sigma),
      ClassExpression::and(a(3), a(2))
    );
    let sigma = Map::from([(1, 2)]);
    assert_eq!(rename(&ClassExpression::any(1, a(1)), &sigma), ClassExpression::any(1, a(2)));
    assert_eq!(rename(&a(1), &sigma), a(2));
  }

  #[test]
  fn rename_and_nnf_commute_for_atom_mappings() {
    let sigma = Map::from([(1, 7), (-1, -7), (2, 9), (-2, -9)]);
    let e = ClassExpression::not(ClassExpression::and(a(1), ClassExpression::any(1, a(2))));
    assert_eq!(nnf(&rename(&e, &sigma)), rename(&nnf(&e), &sigma));
  }

  #[test]
  fn pretty_rendering() {
    let e = ClassExpression::and(
      a(1),
      ClassExpression::or(ClassExpression::not(a(2)), ClassExpression::any(1, Top)),
    );
    assert_eq!(e.to_string(), "C1 ⊓ (¬C2 ⊔ ∃R1.⊤)");
  }

  #[test]
  fn debug_rendering_spells_out_the_structure() {
    let e = ClassExpression::and(a(1), ClassExpression::all(2, ClassExpression::not(a(2))));
    assert_eq!(e.to_string(), "C1 ⊓ ∀R2.¬C2");
    assert_eq!(format!("{e:?}"), "And(Atom(1), All(R2, Not(Atom(2))))");
    assert_eq!(format!("{:?}", ClassExpression::or(Bottom, Top)), "Or(Bottom, Top)");
    // A negative atom and a negated atom display alike but debug apart.
    assert_eq!(a(-2).to_string(), ClassExpression::not(a(2)).to_string());
    assert_eq!(format!("{:?}", a(-2)), "Atom(-2)");
    assert_eq!(format!("{:?}", ClassExpression::not(a(2))), "Not(Atom(2))");
  }
}
