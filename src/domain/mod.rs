//! The in-memory mirror of remote board state.
//!
//! Ownership runs one way: Workspace -> Board -> Group -> Item, each parent
//! holding a title-keyed mapping of its children. Children keep non-owning
//! back-references (remote ids plus the shared remote handle) for lookups;
//! nothing cycles.

pub mod board;
pub mod column;
pub mod group;
pub mod input_board;
pub mod item;
pub mod remote;
pub mod workspace;
