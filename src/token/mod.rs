pub mod identity;
pub mod result;

pub use identity::CredentialIdentity;
pub use result::TokenResult;
