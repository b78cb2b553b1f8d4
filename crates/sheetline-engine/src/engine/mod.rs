//! Tabular projection engine API.
//!
//! Pure, synchronous transformations between the remote grid's shapes and
//! the shapes callers work with:
//!
//! - [`RangeDescriptor`], [`address`] - Range descriptor to addressing string
//! - [`reshape`], [`OutputMode`], [`Reshaped`] - Raw matrices to list / map views
//! - [`ColumnAligner`], [`align_for_update`], [`align_for_append`] - Records to header-ordered rows
//! - [`StyleSpec`], [`StyledCell`] - Batch-level presentation for appended rows
//! - [`CellRef`] - A1 notation to row/col indices
//! - [`CellValue`], [`CellMatrix`], [`InputRecord`] - Scalar and container types

mod align;
mod cell_ref;
mod range;
mod reshape;
mod style;
mod value;

pub use align::{AlignedRow, ColumnAligner, align_for_append, align_for_update};
pub use cell_ref::CellRef;
pub use range::{MAX_SEGMENTS, RangeDescriptor, address};
pub use reshape::{OutputMode, Reshaped, reshape};
pub use style::{
    CellFormat, ColorStyle, DEFAULT_FONT, ExtendedValue, HorizontalAlignment, Rgb, RgbColor,
    StyleOverrides, StyleSpec, StyledCell, StyledRow, TextFormat, VerticalAlignment,
};
pub use value::{CellMatrix, CellValue, InputRecord, text_matrix};
