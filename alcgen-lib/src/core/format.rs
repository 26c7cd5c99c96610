/*!

There are different text representations possible for class expressions and
skeletons depending on the context. This module provides a unified API for
formatting objects across the project.

The trait that types that can be formatted implement is `Formattable`. It
works similar to the standard library's `Display` trait. Unfortunately,
`Display` can't be extended with formatting for user defined types. We
provide a convenience macro that implements `Display` and `Debug` in terms
of `Formattable::repr`.

*/

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FormatStyle {
  #[default]
  Default, // Use the default formatting
  Debug,   // Spell out the tree structure, one constructor per node
}

pub trait Formattable {
  /// Writes a text representation of `self` according to the given `FormatStyle`.
  /// Use `format!` and friends to create a string.
  fn repr(&self, out: &mut dyn std::fmt::Write, style: FormatStyle) -> std::fmt::Result;
}

#[macro_export]
macro_rules! impl_display_debug_for_formattable {
    ($t:ty) => {
        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                <$t as $crate::api::Formattable>::repr(self, f, $crate::api::FormatStyle::Default)
            }
        }

        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                <$t as $crate::api::Formattable>::repr(self, f, $crate::api::FormatStyle::Debug)
            }
        }
    };
}
pub use impl_display_debug_for_formattable;
