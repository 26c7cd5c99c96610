/*!

Manchester OWL syntax serializer.

The generated expression becomes the definition of a single class `D`;
every atomic class and role encountered while serializing is declared after
it. Concept symbols render as `c<n>`, role symbols as `r<n>`, ⊤ as `Thing`
and ⊥ as `Nothing`. Every connective is parenthesized, so the output needs
no precedence knowledge on the consumer side.

*/

use alcgen_abs::Set;
use alcgen_lib::api::ClassExpression;
use std::io::{self, Write};

pub fn to_manchester<W: Write>(expression: &ClassExpression, prefix: &str, out: &mut W) -> io::Result<()> {
  let mut classes: Set<u32> = Set::new();
  let mut roles: Set<u32> = Set::new();
  let body = serialize(expression, &mut classes, &mut roles);

  writeln!(out, "Prefix: : <{prefix}#>")?;
  writeln!(out, "Ontology: <{prefix}>")?;
  writeln!(out, "Class: D")?;
  writeln!(out, "EquivalentTo: {body}")?;
  for class in classes {
    writeln!(out, "Class: c{class}")?;
  }
  for role in roles {
    writeln!(out, "ObjectProperty: r{role}")?;
  }
  Ok(())
}

fn serialize(expression: &ClassExpression, classes: &mut Set<u32>, roles: &mut Set<u32>) -> String {
  use ClassExpression::*;
  match expression {
    Atom(c) if *c < 0 => {
      classes.insert(c.unsigned_abs());
      format!("(not c{})", c.unsigned_abs())
    }
    Atom(c) => {
      classes.insert(c.unsigned_abs());
      format!("c{c}")
    }
    Top => "Thing".to_string(),
    Bottom => "Nothing".to_string(),
    Not(inner) => format!("(not {})", serialize(inner, classes, roles)),
    And(a, b) => format!("({} and {})", serialize(a, classes, roles), serialize(b, classes, roles)),
    Or(a, b) => format!("({} or {})", serialize(a, classes, roles), serialize(b, classes, roles)),
    Any(r, c) => {
      roles.insert(*r);
      format!("(r{r} some {})", serialize(c, classes, roles))
    }
    All(r, c) => {
      roles.insert(*r);
      format!("(r{r} only {})", serialize(c, classes, roles))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn atom(c: i32) -> ClassExpression {
    ClassExpression::atom(c)
  }

  fn render(expression: &ClassExpression) -> String {
    let mut buffer = Vec::new();
    to_manchester(expression, "http://example.com/foo", &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
  }

  #[test]
  fn output_shape_is_exact() {
    let expression = ClassExpression::and(
      atom(1),
      ClassExpression::any(1, ClassExpression::not(atom(2))),
    );
    assert_eq!(
      render(&expression),
      "Prefix: : <http://example.com/foo#>\n\
       Ontology: <http://example.com/foo>\n\
       Class: D\n\
       EquivalentTo: (c1 and (r1 some (not c2)))\n\
       Class: c1\n\
       Class: c2\n\
       ObjectProperty: r1\n"
    );
  }

  #[test]
  fn declarations_are_sorted_and_deduplicated() {
    let expression = ClassExpression::or(
      ClassExpression::and(atom(10), atom(2)),
      ClassExpression::all(3, ClassExpression::any(1, atom(2))),
    );
    let rendered = render(&expression);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
      &lines[4..],
      &["Class: c2", "Class: c10", "ObjectProperty: r1", "ObjectProperty: r3"]
    );
  }

  #[test]
  fn sentinels_render_as_named_classes() {
    let rendered = render(&ClassExpression::and(ClassExpression::Top, ClassExpression::Bottom));
    assert!(rendered.contains("EquivalentTo: (Thing and Nothing)"));
    // Thing and Nothing are builtins, not declared.
    assert!(!rendered.contains("Class: Thing"));
  }

  #[test]
  fn quantifiers_use_some_and_only() {
    let rendered = render(&ClassExpression::all(2, ClassExpression::any(1, atom(1))));
    assert!(rendered.contains("EquivalentTo: (r2 only (r1 some c1))"));
  }
}
