//! Filename search: query matching, highlighting, and "did you mean" suggestions.
//!
//! Everything here is a pure function over an in-memory entry list. Presentation
//! is left to callers, which consume [`FileEntry`](crate::FileEntry) slices,
//! [`Highlighted`] names and [`Suggestion`] values.

pub mod highlight;
pub mod query;
pub mod suggest;

pub use highlight::{Highlighted, Segment, highlight};
pub use query::{Mode, Query, Term, filter, matches};
pub use suggest::{Suggestion, score, suggest};
