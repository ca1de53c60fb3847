// Structured data recovered from cleaned sheet text
pub mod fields;
pub mod revisions;

pub use fields::{Field, FieldCascade, FieldExtractor, FieldMatch, FieldRule};
pub use revisions::{
    dedupe_revisions, parse_revisions, LOOSE_PATTERN, STAGE_PATTERN, UPPERCASE_PATTERN,
};
