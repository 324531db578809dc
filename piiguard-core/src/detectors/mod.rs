// piiguard-core/src/detectors/mod.rs
//! This module contains the PII detector implementations.
//!
//! The heuristic detector is a synchronous, pure pattern scanner built on the
//! fixed capability table. The semantic detector is an asynchronous external
//! capability behind a trait; the core consumes its result contract only and
//! never branches on the backend identity. Both emit the same `Span` values,
//! so downstream merging and redaction are detector-agnostic.
//!
//! # License
//! MIT OR Apache-2.0

pub mod heuristic;
pub mod semantic;
