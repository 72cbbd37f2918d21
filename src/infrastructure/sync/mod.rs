//! Synchronization machinery.
//!
//! Primary components:
//! 1. engine: hydrates the entity model and drives board create/attach
//! 2. dispatcher: polls an input board and dispatches new items to handlers
//! 3. runner: spawns dispatcher and handler units as independent tasks

pub mod dispatcher;
pub mod engine;
pub mod runner;
