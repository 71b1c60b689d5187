pub mod mock;

pub use mock::{MockChainProvider, MockSigner};
