//! Core engine — enumerate → fetch → parse → write.

pub mod enumerator;
pub mod parser;
pub mod harvester;
pub mod runner;
