//! Scene files (`.rt`).
//!
//! A scene file is a list of commands, one per line:
//!
//! ```text
//! RT 2
//! CAMERA 0 0 5  0 0 0  0 1 0  60 1 100  640 480
//! SCENE 0 0 0  25 25 25  null
//! MATERIAL 255 0 0  255 255 255  40  0  1  1  null
//! LIGHT 5 5 5  255 255 255
//! SPHERE 0  1  0 0 0
//! ```
//!
//! Colors are written in the 0-255 range. Objects are numbered in the order
//! they appear, and `BTREE a b op` combines objects `a` and `b` into a new
//! CSG object (op 0 union, 1 intersection, 2 difference, 3 surface-point
//! intersection).
//!
//! Parsing produces a [`SceneDescription`]: plain data with file paths
//! resolved but not yet loaded.

mod parser;
mod types;

pub use parser::*;
pub use types::*;
