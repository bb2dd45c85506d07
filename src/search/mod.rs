//! Case-insensitive search over text buffers with cyclic match navigation.

pub mod matcher;
pub mod session;

pub use matcher::{Direction, MatchPosition, MatchSet, SearchStatus, TextMatch, search};
pub use session::{BufferId, SearchSession};
