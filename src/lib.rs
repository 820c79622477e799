//! # pericope
//!
//! Converts tabular verse records of a segmented ancient-language text into a
//! nested chapter → pericope → verse → token JSON document, validating along
//! the way that the editorial pericope intervals form a sane partition of
//! each chapter's verses.
//!
//! The pipeline is a single-threaded, idempotent batch transform: two CSV
//! tables in, one JSON tree out. See [`corpus::pipeline`] for the
//! orchestration entry point and the `pericope` binary for the CLI surface.

pub mod corpus;
