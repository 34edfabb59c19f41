//! Command-line workflows shared by the binary

pub mod orchestration;
