//! # Core Controller Logic
//!
//! This module contains dana's business logic. It knows nothing about any
//! specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!                     ┌──────────┴──────────┐
//!                     ▼                     ▼
//!              ┌────────────┐        ┌────────────┐
//!              │    TUI     │        │    api     │
//!              │  Adapter   │        │ (reqwest)  │
//!              │ (ratatui)  │        │            │
//!              └────────────┘        └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all controller state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`transcript`]: The append-only message log
//! - [`config`]: Settings file + resolution

pub mod action;
pub mod config;
pub mod state;
pub mod transcript;
