//! Batch reduction of a decision log into an ethical verdict. Pure,
//! synchronous and independent of the per-tick loop.

pub mod analyser;

pub use analyser::{analyse, analyse_records, DecisionInput, RunReport, Verdict};
