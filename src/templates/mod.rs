//! Template selection and rendering.
//!
//! Banks themselves live in [`crate::prompts`]; this module decides which
//! template comes next and fills its placeholders.

mod render;
mod selector;

pub use render::*;
pub use selector::*;
