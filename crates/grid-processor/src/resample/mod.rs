//! Swath-to-grid resampling.
//!
//! Two assignment strategies share one deterministic tie rule:
//!
//! - [`ResampleMode::Nearest`](crate::ResampleMode::Nearest): every target
//!   cell queries an R-tree of the valid input points for the nearest one
//!   within the radius of influence. O(N log N) to build, O(log N) per cell.
//! - [`ResampleMode::Bucket`](crate::ResampleMode::Bucket): every input point
//!   is dropped into its own nearest cell; the cell keeps the closest point.
//!   O(N), no index.
//!
//! Candidates whose distances differ by at most the configured tie tolerance
//! are equidistant; the lowest input index wins.

mod index;
mod swath;
mod target;

pub use swath::SwathResampler;
pub use target::{TargetGrid, MAX_TARGET_CELLS};
