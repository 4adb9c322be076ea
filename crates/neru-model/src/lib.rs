//! Element/Hint data model and the per-activation hint collection (§3, §4.2).

mod collection;
mod element;
mod hint;

pub use collection::HintCollection;
pub use element::{Element, Role};
pub use hint::Hint;
