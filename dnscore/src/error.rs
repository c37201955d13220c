//! Error and outcome types shared across the crate.
//!
//! Following the taxonomy in the specification's error-handling design:
//! *errors* (malformed input, resource exhaustion, integrity violations) are
//! modelled as `thiserror`-derived enums and returned as the `Err` side of a
//! `Result`. *Lookup outcomes* (`NXDOMAIN`, `DELEGATION`, `GLUE`, ...) are not
//! failures in the Rust sense — they are meaningful answers — and so are
//! returned as a plain enum inside `Ok`, see [`crate::zonedb::FindResult`].

use crate::name::Name;

/// Errors encountered while constructing, parsing, or serialising a [`Name`].
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum NameError {
    #[error("label length {0} exceeds the 63-octet maximum")]
    LabelTooLong(usize),

    #[error("name length {0} exceeds the 255-octet maximum")]
    NameTooLong(usize),

    #[error("compression pointer at offset {0} is not strictly backward")]
    BadPointer(usize),

    #[error("compression pointer chain exceeded the tree depth without reaching the root")]
    PointerLoop,

    #[error("buffer ended in the middle of a label")]
    Truncated,

    #[error("label length byte {0:#04x} is neither a plain label nor a pointer")]
    BadLabelLength(u8),

    #[error("empty label in the middle of a name")]
    EmptyMidLabel,

    #[error("non-ASCII octet in a text-form name")]
    NonAscii,

    #[error("names are not part of the same tree, no common origin")]
    Disjoint,
}

/// Errors encountered while decoding a [`crate::buffer::Buffer`]'s contents.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum BufferError {
    #[error("attempted to read past the end of the active region")]
    Underrun,

    #[error("attempted to write past the end of the buffer")]
    Overrun,
}

/// Errors encountered while decoding or encoding rdata of a known type.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RdataError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("rdata for type {0:?} ended before RDLENGTH octets were consumed")]
    Truncated(crate::rdata::types::RecordType),

    #[error("rdata for type {0:?} has {1} trailing octets after its fields were read")]
    TrailingData(crate::rdata::types::RecordType, usize),

    #[error("zone file syntax error: {0}")]
    Syntax(String),

    #[error("number {0} is out of range for this field")]
    NumberOutOfRange(String),

    #[error("invalid base64 in rdata text: {0}")]
    BadBase64(String),

    #[error("invalid hex in rdata text: {0}")]
    BadHex(String),

    #[error("character-string exceeds 255 octets")]
    CharacterStringTooLong,

    #[error("unknown class or type mnemonic: {0}")]
    UnknownMnemonic(String),

    #[error("algorithm {0} is not implementable by this build")]
    UnimplementableAlgorithm(u8),
}

/// Errors from the rdataslab merge/subtract operations.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum SlabError {
    #[error("operation produced no change (existing slab already a superset)")]
    Unchanged,

    #[error("rdata in the slab belongs to incompatible types")]
    TypeMismatch,
}

/// Errors surfaced by the RBT name tree.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RbtError {
    #[error("name {0:?} was not found in the tree")]
    NotFound(Name),

    #[error("find callback aborted the search: {0}")]
    CallbackAborted(String),
}

/// Integrity and protocol-level errors from the zone database core.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Rbt(#[from] RbtError),

    #[error("database invariant violated: {0}")]
    BadDb(&'static str),

    #[error("a writer version is already open on this database")]
    WriterAlreadyOpen,

    #[error("no space left (simulated resource exhaustion)")]
    NoSpace,
}

/// Errors from the (interface-only) TSIG subsystem.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TsigError {
    #[error("a TSIG record was expected on this message but none was present")]
    ExpectedTsig,

    #[error("a TSIG record was present but none was expected")]
    UnexpectedTsig,

    #[error("the TSIG record itself carries a nonzero error code")]
    TsigErrorSet,

    #[error("TSIG MAC verification failed")]
    VerifyFailure,
}

/// Errors from the (interface-only) zone-lifecycle state machine.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ZoneLifecycleError {
    #[error("{0} is an external collaborator and not implemented by this core")]
    NotImplemented(&'static str),

    #[error("zone parse failed, prior version remains current: {0}")]
    ParseFailed(String),

    #[error("a partial transfer was rolled back: {0}")]
    TransferAborted(String),
}
