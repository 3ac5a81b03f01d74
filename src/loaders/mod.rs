pub mod font_loader;
pub mod typeface;

pub use font_loader::{FontLoader, FontPoll, FontRequest, TextState};
pub use typeface::{Glyph, PathCommand, Typeface};
