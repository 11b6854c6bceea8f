//! Domain entities - Core business objects with identity

mod chapter;
mod character;
mod story;

pub use chapter::Chapter;
pub use character::Character;
pub use story::Story;
