//! Processing stages of the change map: quality-mask decoding, grid
//! alignment, normalized-difference index and delta, severity classification,
//! statistics, rendering, and the staged artifact save.
pub mod align;
pub mod classify;
pub mod index;
pub mod mask;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod save;
pub mod stats;
