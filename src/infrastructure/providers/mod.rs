mod amara;
mod mock_provider;

pub use amara::{AmaraConfig, AmaraProvider};
pub use mock_provider::MockProvider;
