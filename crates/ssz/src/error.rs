/// Grammar-level failures shared by every encoder, decoder and hasher.
///
/// All variants are terminal for the call that produced them; a partially
/// decoded value is never returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SszError {
    /// Input ended before a fixed region could be read.
    #[error("insufficient bytes: need {need}, have {have}")]
    InsufficientBytes { need: usize, have: usize },

    /// A static value was handed a slice of the wrong width.
    #[error("invalid length {have} for fixed-size value of {expected} bytes")]
    InvalidFixedLength { have: usize, expected: usize },

    #[error("{have} bytes is not a multiple of element size {elem}")]
    NotMultipleOfElementSize { have: usize, elem: usize },

    /// Declared or inferred element count exceeds the field maximum.
    #[error("list length {have} exceeds maximum {max}")]
    ListTooLong { have: usize, max: u64 },

    /// First offset does not point at the end of the fixed region.
    #[error("invalid variable offset {offset}, expected {expected}")]
    InvalidVariableOffset { offset: usize, expected: usize },

    #[error("offset {offset} beyond capacity {capacity}")]
    OffsetBeyondCapacity { offset: usize, capacity: usize },

    #[error("bad offset progression: {prev} followed by {next}")]
    BadOffsetProgression { prev: usize, next: usize },

    /// Encoded position does not fit the 4-byte offset slot.
    #[error("offset {0} does not fit in u32")]
    OffsetOverflow(usize),

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    /// A reserved field holds data.
    #[error("{field} must be unused")]
    MustBeUnused { field: &'static str },

    /// Fixed region of a container was not fully consumed or overrun.
    #[error("fixed region mismatch: wrote {have}, declared {expected}")]
    FixedRegionMismatch { have: usize, expected: usize },

    #[error("no dynamic field at position {0}")]
    MissingDynamicField(usize),

    #[error("index {index} outside a tree of {leaves} leaves")]
    IndexOutOfRange { index: u64, leaves: u64 },

    /// Generalized indices are u64, so trees stop at depth 63.
    #[error("tree depth {0} does not fit a generalized index")]
    TreeTooDeep(usize),

    #[error("proof has {have} nodes, expected {expected}")]
    InvalidProofLength { have: usize, expected: usize },

    #[error("{}", render_joined(.0))]
    Multiple(Vec<SszError>),
}

pub type Result<T> = core::result::Result<T, SszError>;

impl SszError {
    /// Stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SszError::InsufficientBytes { .. } => "insufficient_bytes",
            SszError::InvalidFixedLength { .. } => "invalid_fixed_length",
            SszError::NotMultipleOfElementSize { .. } => "not_multiple_of_element",
            SszError::ListTooLong { .. } => "list_too_long",
            SszError::InvalidVariableOffset { .. } => "invalid_variable_offset",
            SszError::OffsetBeyondCapacity { .. } => "offset_beyond_capacity",
            SszError::BadOffsetProgression { .. } => "bad_offset_progression",
            SszError::OffsetOverflow(_) => "offset_overflow",
            SszError::InvalidBool(_) => "invalid_bool",
            SszError::MustBeUnused { .. } => "must_be_unused",
            SszError::FixedRegionMismatch { .. } => "fixed_region_mismatch",
            SszError::MissingDynamicField(_) => "missing_dynamic_field",
            SszError::IndexOutOfRange { .. } => "index_out_of_range",
            SszError::TreeTooDeep(_) => "tree_too_deep",
            SszError::InvalidProofLength { .. } => "invalid_proof_length",
            SszError::Multiple(_) => "multiple",
        }
    }

    /// True if this error, or any error joined into it, is a reserved-field violation.
    pub fn is_must_be_unused(&self) -> bool {
        match self {
            SszError::MustBeUnused { .. } => true,
            SszError::Multiple(errs) => errs.iter().any(SszError::is_must_be_unused),
            _ => false,
        }
    }
}

/// Collapse a set of independent check results into one.
///
/// Nothing failed: `Ok(())`. One failure: that error. More: `Multiple`.
pub fn join_errors<I>(results: I) -> Result<()>
where
    I: IntoIterator<Item = Result<()>>,
{
    let mut errs: Vec<SszError> = results.into_iter().filter_map(|r| r.err()).collect();
    match errs.len() {
        0 => Ok(()),
        1 => Err(errs.remove(0)),
        _ => Err(SszError::Multiple(errs)),
    }
}

fn render_joined(errs: &[SszError]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_single_error_unwrapped() {
        let e = SszError::InvalidBool(7);
        assert_eq!(join_errors([Ok(()), Err(e.clone())]), Err(e));
        assert_eq!(join_errors([Ok(()), Ok(())]), Ok(()));
    }

    #[test]
    fn joined_errors_render_in_order() {
        let err = join_errors([
            Err(SszError::MustBeUnused { field: "attestations" }),
            Ok(()),
            Err(SszError::InvalidBool(2)),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "attestations must be unused; invalid boolean byte 0x02"
        );
        assert!(err.is_must_be_unused());
        assert_eq!(err.kind(), "multiple");
    }
}
