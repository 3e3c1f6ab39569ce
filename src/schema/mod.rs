//! # Schema Module
//!
//! Types and loaders for the field schema (`config.json`) that drives every
//! generated artifact of a component.
//!
//! ```json
//! {
//!   "fields": [
//!     { "key": "title", "label": "Title", "type": "text" },
//!     { "key": "slides", "label": "Slides", "type": "repeater",
//!       "subFields": [ { "key": "photo", "label": "Photo", "type": "image" } ] }
//!   ],
//!   "template": "<h2>{{title}}</h2>{{#slides}}<img src=\"{{photo}}\" alt=\"{{photo_alt}}\">{{/slides}}",
//!   "css": ".hero { padding: 2rem; }"
//! }
//! ```
//!
//! Field order is significant: it decides the order of sidebar controls,
//! attributes and cheat-sheet entries.

mod load;
mod types;

pub use load::*;
pub use types::*;
