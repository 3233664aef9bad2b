use beacon_ssz::SszError;
use thiserror::Error;

use crate::version::ForkVersion;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Ssz(#[from] SszError),

    #[error("unknown fork version {0:02x?}")]
    UnknownVersion([u8; 4]),

    /// Construction or decode asked for a version outside the type's window.
    #[error("{ty} does not support fork version {version}")]
    UnsupportedVersion {
        ty: &'static str,
        version: ForkVersion,
    },

    /// A version-gated field was set (or read) before its fork.
    #[error("{field} is not available before {since}, object is {version}")]
    FieldNotSupported {
        field: &'static str,
        since: ForkVersion,
        version: ForkVersion,
    },

    /// A nested versioned object does not share its parent's version.
    #[error("{field} carries version {child}, parent is {parent}")]
    VersionMismatch {
        field: &'static str,
        parent: ForkVersion,
        child: ForkVersion,
    },

    #[error("execution request types must be strictly increasing: {prev:#04x} then {next:#04x}")]
    InvalidRequestsOrder { prev: u8, next: u8 },

    #[error("execution request of type {0:#04x} carries no data")]
    EmptyRequest(u8),

    #[error("unknown execution request type {0:#04x}")]
    UnknownRequestType(u8),

    #[error("withdrawal credentials do not carry an execution address")]
    InvalidWithdrawalCredentials,

    #[error("payload carries {have} blob hashes, request lists {expected}")]
    MismatchedVersionedHashCount { have: usize, expected: usize },

    #[error("versioned hash {index} does not match the payload")]
    InvalidVersionedHash { index: usize },

    #[error("payload block hash mismatch: computed {computed}, payload has {payload}")]
    BlockHashMismatch { computed: String, payload: String },

    #[error("execution block builder: {0}")]
    Builder(String),

    #[error("signer: {0}")]
    Signer(String),

    #[error("{}", render_joined(.0))]
    Multiple(Vec<Error>),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Ssz(e) => e.kind(),
            Error::UnknownVersion(_) => "unknown_version",
            Error::UnsupportedVersion { .. } => "unsupported_version",
            Error::FieldNotSupported { .. } => "field_not_supported",
            Error::VersionMismatch { .. } => "version_mismatch",
            Error::InvalidRequestsOrder { .. } => "invalid_requests_order",
            Error::EmptyRequest(_) => "empty_request",
            Error::UnknownRequestType(_) => "unknown_request_type",
            Error::InvalidWithdrawalCredentials => "invalid_withdrawal_credentials",
            Error::MismatchedVersionedHashCount { .. } => "mismatched_versioned_hash_count",
            Error::InvalidVersionedHash { .. } => "invalid_versioned_hash",
            Error::BlockHashMismatch { .. } => "block_hash_mismatch",
            Error::Builder(_) => "builder",
            Error::Signer(_) => "signer",
            Error::Multiple(_) => "multiple",
        }
    }

    /// True if this error, or any error joined into it, is a reserved-field violation.
    pub fn is_must_be_unused(&self) -> bool {
        match self {
            Error::Ssz(e) => e.is_must_be_unused(),
            Error::Multiple(errs) => errs.iter().any(Error::is_must_be_unused),
            _ => false,
        }
    }
}

/// Join independent post-decode checks, flattening nested joins.
pub fn join<I>(results: I) -> Result<()>
where
    I: IntoIterator<Item = Result<()>>,
{
    let mut errs = Vec::new();
    for r in results {
        match r {
            Ok(()) => {}
            Err(Error::Multiple(inner)) => errs.extend(inner),
            Err(Error::Ssz(SszError::Multiple(inner))) => {
                errs.extend(inner.into_iter().map(Error::Ssz))
            }
            Err(e) => errs.push(e),
        }
    }
    match errs.len() {
        0 => Ok(()),
        1 => Err(errs.remove(0)),
        _ => Err(Error::Multiple(errs)),
    }
}

fn render_joined(errs: &[Error]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Record a rejected decode before handing the error back.
pub(crate) fn decode_rejected(ty: &'static str, err: Error) -> Error {
    log::debug!("rejecting {ty} decode: {err}");
    if let Error::Ssz(e) = &err {
        beacon_ssz::metrics::decode_rejected(e);
    }
    err
}

/// Record a rejected encode before handing the error back.
pub(crate) fn encode_rejected(ty: &'static str, err: Error) -> Error {
    log::debug!("rejecting {ty} encode: {err}");
    if let Error::Ssz(e) = &err {
        beacon_ssz::metrics::encode_rejected(e);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_flattens_and_detects_unused() {
        let nested = Error::Multiple(vec![
            Error::Ssz(SszError::MustBeUnused { field: "attestations" }),
            Error::EmptyRequest(0),
        ]);
        let err = join([Ok(()), Err(nested), Err(Error::EmptyRequest(2))]).unwrap_err();
        match &err {
            Error::Multiple(v) => assert_eq!(v.len(), 3),
            other => panic!("expected Multiple, got {other:?}"),
        }
        assert!(err.is_must_be_unused());
        assert!(join([Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn join_lifts_grammar_level_joins() {
        let reserved = Error::Ssz(SszError::Multiple(vec![
            SszError::MustBeUnused { field: "attestations" },
            SszError::MustBeUnused { field: "voluntary_exits" },
        ]));
        let err = join([Err(reserved), Err(Error::EmptyRequest(1))]).unwrap_err();
        assert_eq!(
            err,
            Error::Multiple(vec![
                Error::Ssz(SszError::MustBeUnused { field: "attestations" }),
                Error::Ssz(SszError::MustBeUnused { field: "voluntary_exits" }),
                Error::EmptyRequest(1),
            ])
        );
    }
}
