pub mod auth;
pub mod router;
pub mod session;

pub use auth::{
    verify_stored_user, HttpLoginVerifier, LoginVerifier, UserProfile, ERR_INVALID_CREDENTIAL,
    ERR_NO_USER, ERR_SAVE_FAILED, ERR_VERIFY_FAILED, USER_ID_HEADER,
};
pub use router::Coordinator;
pub use session::InspectionSession;
