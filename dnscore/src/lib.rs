#![warn(clippy::pedantic)]
// Sometimes a redundant else is clearer.
#![allow(clippy::redundant_else)]
// Don't care enough to fix.
#![allow(clippy::match_same_arms)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::missing_errors_doc)]

//! A zone database engine and DNS wire/rdata codec: the name tree, MVCC
//! rdataset storage, and ~40-type rdata codec underlying an authoritative
//! and recursive name server, without the network I/O, crypto, and
//! transport layers that sit on top of it (see `dnscore-cli` for a thin
//! consumer of this library's public API).

pub mod acl;
pub mod buffer;
pub mod error;
pub mod lexer;
pub mod lifecycle;
pub mod name;
pub mod rbt;
pub mod rdata;
pub mod rdataslab;
pub mod tsig;
pub mod wire;
pub mod zonedb;
