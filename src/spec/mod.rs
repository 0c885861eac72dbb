pub mod dra;
pub mod node_helpers;
