//! Builtin prelude
//!
//! The prelude has no source file on disk and therefore no meaningful
//! timestamp: it is injected as a virtual record with the never-rebuild
//! policy, compiled in memory when some module imports it, and never
//! written to the output tree.

use crate::input::InputRecord;

/// Source text of the builtin prelude module.
///
/// Names prefixed with `__prim_` are backend intrinsics.
pub const PRELUDE_SOURCE: &str = "\
module Prelude

def add a b = __prim_add a b
def sub a b = __prim_sub a b
def mul a b = __prim_mul a b
def identity x = x
def compose f g x = f (g x)
def flip f a b = f b a
";

/// Build the virtual input record for the prelude.
pub fn prelude_record() -> InputRecord {
    InputRecord::builtin(PRELUDE_SOURCE)
}
