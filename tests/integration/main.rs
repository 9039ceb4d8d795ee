//! Cross-layer integration tests for Loreforge.
//!
//! Tests that drive the full load sequence, from definition files on disk
//! through the frozen [`loreforge::codex::Codex`], and roll the resulting
//! dice values deterministically.

mod full_load;
