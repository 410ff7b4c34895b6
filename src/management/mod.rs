mod auth;
mod store;

pub use auth::LifecycleError;
pub use auth::Session;
pub use auth::TokenManager;
pub use store::CredentialStore;
pub use store::StoreError;
pub use store::merge;
