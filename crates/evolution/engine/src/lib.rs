#![deny(unsafe_code)]
//! # evolution-engine
//!
//! Wires the evolution crates into one per-session runtime.
//!
//! ```text
//! EventEmitter ──debounce──▶ SessionStore ──▶ classify ──▶ reward
//!                                                          │
//!        snapshot (watch) ◀── analytics ◀── controller ◀───┘
//! ```
//!
//! [`EngineContext`] holds the process-wide stores. Each
//! [`EvolutionEngine::mount`] gets a fresh anonymous session and its own
//! controller; [`EvolutionEngine::spawn`] runs the evaluation loop until
//! [`EngineHandle::shutdown`].

pub mod clock;
pub mod config;
pub mod context;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod runner;

pub use clock::TokioClock;
pub use config::{AnalyticsConfig, EngineConfig, LoggingConfig, LoopConfig};
pub use context::EngineContext;
pub use emitter::EventEmitter;
pub use engine::{EngineSnapshot, EvolutionEngine, TickOutcome, TickReport};
pub use error::EngineError;
pub use runner::EngineHandle;
