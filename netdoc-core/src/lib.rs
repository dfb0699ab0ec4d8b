#![doc = "netdoc-core: configuration-dump analysis pipeline for netdoc."]

//! Turns free-text router/switch configuration dumps into a structured
//! device model, a categorized audit report, a neighbor topology graph and
//! rendered documents.
//!
//! The crate does no network or filesystem I/O. Narrative text comes from a
//! caller-supplied [`narrative::NarrativeGenerator`].
//!
//! # Usage
//! ```no_run
//! use netdoc_core::pipeline::analyze;
//! use netdoc_core::render::{Format, ReportLabels};
//!
//! let analysis = analyze(b"hostname SW1\n");
//! let html = analysis.render(Format::Html, &ReportLabels::default(), None);
//! ```

pub mod audit;
pub mod extract;
pub mod model;
pub mod narrative;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod topology;
