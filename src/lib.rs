//! # scanline-region
//!
//! Boolean algebra over planar integer regions stored as run-length encoded
//! scanlines.
//!
//! A region is any set of integer points that can be built from axis-aligned
//! rectangles. Regions support:
//!
//! - Union, intersection, difference, XOR, reverse difference and replace
//! - Point, rectangle and region containment
//! - Early-exit intersection tests
//! - Decomposition into rectangles and per-row spans
//! - A canonical `SkRegion(...)` text form
//!
//! ## Architecture
//!
//! 1. **Rect**: half-open integer rectangle (`basics`)
//! 2. **Run storage**: growable run buffer and the scanline encoding of a
//!    complex region (`array`, `run_head`)
//! 3. **Sweep**: merges two run encodings scanline by scanline under a
//!    boolean operator (`scanline_boolean_algebra`)
//! 4. **Region**: empty / rect / complex state, queries and operations
//!    (`region`)
//! 5. **Walkers**: rectangle, clipped rectangle and span iteration
//!    (`region_iterator`), plus the text form (`region_text`)

pub mod array;
pub mod basics;
pub mod region;
pub mod region_iterator;
pub mod region_text;
pub mod run_head;
pub mod scanline_boolean_algebra;

pub use basics::{Rect, SENTINEL};
pub use region::Region;
pub use region_iterator::{Cliperator, RegionIter, Spanerator};
pub use region_text::RegionParseError;
pub use scanline_boolean_algebra::RegionOp;
