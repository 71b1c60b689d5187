pub mod address;
pub mod amount;

pub use address::{Address, AddressParseError};
pub use amount::Amount;
