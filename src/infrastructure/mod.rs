pub mod sync;
pub mod web;
