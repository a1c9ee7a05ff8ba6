mod private_transfer;
mod treasury_mint;

pub use private_transfer::*;
pub use treasury_mint::*;
