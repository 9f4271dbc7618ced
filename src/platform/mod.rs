//! Platform abstraction layer
//!
//! Input sources translate device events (keys, touch pointers) into the
//! shared [`InputState`](crate::sim::InputState). A shell merges the sources
//! each frame before ticking.

pub mod input;

pub use input::{Key, KeyboardKeys, TouchButton, TouchButtons, TouchLayout};
