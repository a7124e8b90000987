//! The rb_graph crate.
//!
//! Provides element graphs over RNA secondary structures:
//!  - PairTable: validated 1-based pairing tables.
//!  - Dot-bracket parsing, including `&`-separated cofold strands.
//!  - BulgeGraph: stems, hairpins, interior loops, multiloop segments
//!    and dangling ends, with their adjacencies.
//!  - Cofold splitting and connectivity checking.
//!

mod bulge_graph;
mod cofold;
mod connectivity;
mod construction;
mod dotbracket;
mod element;
mod error;
mod pair_table;

pub use bulge_graph::*;
pub use cofold::*;
pub use connectivity::*;
pub use dotbracket::*;
pub use element::*;
pub use error::*;
pub use pair_table::*;
