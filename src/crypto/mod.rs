mod commitment;
mod pedersen;

pub mod random;

pub use commitment::*;
pub use pedersen::*;
