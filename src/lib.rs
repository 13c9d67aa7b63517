//! Phrasecount - three-word phrase frequency counting
//!
//! Counts every run of three consecutive normalized words across any number of
//! text sources and reports the most frequent ones.
//!
//! ```
//! use phrasecount::phrases::{rank_sources, Ranker};
//!
//! let ranking = rank_sources([["the cat sat on the mat. the cat ran."]], &Ranker::default());
//! assert_eq!(ranking.entries().len(), 7);
//! ```

pub mod cli;
pub mod config;
pub mod models;
pub mod phrases;
pub mod pipeline;
pub mod reporters;
