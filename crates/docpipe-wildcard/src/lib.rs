//! Docpipe Wildcard
//!
//! Resolves a task's declared input ("source handle") against the results of
//! earlier tasks.
//!
//! # Flow
//! 1. Pattern compilation: `["*.txt", "docs/*"]` → anchored matchers
//! 2. Reference extraction: walk `deps`, read `acc[label].data.files`, keep
//!    entries whose `name` matches
//! 3. Resolution: concrete sources pass through, filters become `{files}`
//!
//! # Source handles
//! ```json
//! { "reference": "9b2c..." }
//! { "url": "https://example.com/report.pdf" }
//! { "text": "some inline text" }
//! { "filter": ["*.png", "scans/*.tif"] }
//! ```
//!
//! A filter reads from every task named in `deps`. Each dependency is
//! expected to have produced an exploded-container listing:
//! ```json
//! { "files": [ { "name": "a.txt", "reference": "r1" } ] }
//! ```

mod extract;
mod pattern;
mod resolve;
mod types;

pub use extract::extract_refs;
pub use pattern::{WildcardPattern, compile, matches_any};
pub use resolve::resolve;
pub use types::{Accumulator, FileRef, ResolvedReference, SourceHandle, TaskOutcome};
