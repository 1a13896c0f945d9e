//! # Core Application Logic
//!
//! Wiring between the page and whatever hosts it. Knows nothing about any
//! specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │                         │
//!                    │  • config (layered)     │
//!                    │  • Action / Envelope    │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    page    │      │    api     │
//!     │  (ratatui) │      │ controllers│      │  (reqwest) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: defaults → config file → env vars → CLI flags
//! - [`action`]: backend results and the `update()` reducer

pub mod action;
pub mod config;
