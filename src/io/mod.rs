//! I/O utilities peripheral to the graph core

pub mod sniff;

pub use sniff::SniffReader;
