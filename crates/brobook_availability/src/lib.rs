// --- File: crates/brobook_availability/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_dst_test;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;
