//! Built-in bears.

pub mod duplicate_content;
pub mod line_count;
pub mod line_length;
pub mod space_consistency;

pub use duplicate_content::DuplicateContentBear;
pub use line_count::LineCountBear;
pub use line_length::LineLengthBear;
pub use space_consistency::SpaceConsistencyBear;
