//! # PDF Quiz
//!
//! Turns a PDF into an interactive quiz graded by a local language model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────┐
//! │   PDF    │──▶│ Splitter │──▶│ Vector index │  (built + persisted)
//! │ extract  │   │ 1500/100 │   │ faiss_index/ │
//! └──────────┘   └────┬─────┘   └──────────────┘
//!                     │ first 3500 chars
//!                     ▼
//!               ┌───────────┐   ┌──────────────┐
//!               │ Question  │──▶│ Quiz session │◀──▶ terminal
//!               │ generator │   │ judge/reveal │
//!               └───────────┘   └──────────────┘
//! ```
//!
//! Every model call goes to an Ollama endpoint (`llama2` for text,
//! `nomic-embed-text` for embeddings by default).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | PDF page extraction |
//! | [`chunk`] | Recursive text splitting |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | Persistent similarity index |
//! | [`llm`] | Text-generation client |
//! | [`questions`] | Question prompt and parsing |
//! | [`quiz`] | Quiz state machine and terminal loop |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod index;
pub mod llm;
pub mod models;
pub mod questions;
pub mod quiz;
