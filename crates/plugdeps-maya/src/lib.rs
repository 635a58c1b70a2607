//! Maya ASCII scene decoder.
//!
//! Only the parts of a `.ma` file that plugdeps needs are interpreted:
//! the header line and every `requires` statement. All other statements
//! are tokenized just far enough to find where they end.
//!
//! ```rust
//! let scene = plugdeps_maya::parse_str(
//!     "//Maya ASCII 2018 scene\nrequires maya \"2018\";\nrequires \"mtoa\" \"3.0.1\";\n",
//! )
//! .unwrap();
//!
//! let names: Vec<_> = scene.plugin_names().collect();
//! assert_eq!(names, vec!["maya", "mtoa"]);
//! ```

mod error;
mod lexer;
mod scene;

pub use error::ParseError;
pub use scene::{Requirement, SceneFile, parse, parse_bytes, parse_str};

/// Prefix every Maya ASCII file starts with.
pub const HEADER_PREFIX: &str = "//Maya ASCII";
