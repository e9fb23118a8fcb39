// src/auth/mod.rs
// Identity collaborator: given a request, yield a user identity or none.
// Token issuance itself lives outside this service; we only resolve
// opaque bearer tokens against the store.

pub mod extractor;
pub mod store;
pub mod types;

pub use extractor::AuthUser;
pub use store::AuthStore;
pub use types::{Identity, Instructor, Role};
