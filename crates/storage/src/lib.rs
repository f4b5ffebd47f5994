pub mod credentials;

pub use credentials::{CredentialStore, KEY_AUTH_TOKEN, KEY_USER_ID};
