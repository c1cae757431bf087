//! Per-compilation mutable state threaded through the code generator.

use crate::env::Environment;

/// Stack slot width on the target, in bytes.
pub const WORD_SIZE: i32 = 4;

/// State the generator carries while walking the tree: the next free stack
/// slot, the live symbol environment, and a counter for unique labels.
///
/// One `Context` lives for a whole-program compilation; [`Context::new_scope`]
/// resets the per-function parts when a new function begins.
#[derive(Debug)]
pub struct Context {
  /// Byte offset from `%ebp` of the next unused stack slot. Strictly
  /// negative, only ever decremented, and only by `WORD_SIZE` at a time.
  pub stack_offset: i32,
  pub env: Environment,
  label_count: u32,
}

impl Context {
  pub fn new() -> Self {
    Self {
      stack_offset: -WORD_SIZE,
      env: Environment::new(),
      label_count: 0,
    }
  }

  /// Claim the current stack slot and advance the cursor to the next one.
  /// The caller must emit the matching `%esp` adjustment.
  pub fn reserve_slot(&mut self) -> i32 {
    let slot = self.stack_offset;
    self.stack_offset -= WORD_SIZE;
    slot
  }

  /// Discard the previous environment and reset the stack cursor to the
  /// first local slot. Called when generation enters a new function.
  pub fn new_scope(&mut self) {
    self.env = Environment::new();
    self.stack_offset = -WORD_SIZE;
  }

  /// Return a label unique for the lifetime of this context, formed from
  /// `prefix` and a monotonic counter. The counter is shared across all
  /// prefixes, so labels never collide even when prefixes repeat.
  pub fn fresh_label(&mut self, prefix: &str) -> String {
    let label = format!(".{prefix}_{}", self.label_count);
    self.label_count += 1;
    label
  }
}

impl Default for Context {
  fn default() -> Self {
    Self::new()
  }
}
