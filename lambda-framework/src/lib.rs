//! The render graph compiler of LambdaEngine. A declarative description of render, compute and
//! ray tracing stages is turned into a linear sequence of render stages interleaved with the
//! synchronization stages (barriers, queue ownership transfers) needed to run them correctly.

pub mod graph;

pub use lambda_api as api;
