use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use domlens_core::config::AuthConfig;
use domlens_core::{Error, Result};
use domlens_storage::{CredentialStore, KEY_USER_ID};

/// Header carrying the stored user id to the verification endpoint.
pub const USER_ID_HEADER: &str = "x-domlens-user-id";

/// Fixed UI strings for the terminal failure modes of the sign-in flow.
/// None of these paths is retried automatically.
pub const ERR_NO_USER: &str = "No user id found. Please log in.";
pub const ERR_INVALID_CREDENTIAL: &str = "Invalid user id. Please log in again.";
pub const ERR_VERIFY_FAILED: &str = "Failed to verify user. Please try again.";
pub const ERR_SAVE_FAILED: &str = "Failed to save user id. Please try again.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
}

impl UserProfile {
    /// Display name preference: name, then email, then the raw id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Boundary to the external verification endpoint. A trait so the flow is
/// testable without a server.
#[async_trait]
pub trait LoginVerifier: Send + Sync {
    /// Checks a user id against the backend. `Error::Auth` means the
    /// backend rejected the id; any other error is a transport failure.
    async fn verify(&self, user_id: &str) -> Result<UserProfile>;
}

pub struct HttpLoginVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpLoginVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            verify_url: config.verify_url.clone(),
        })
    }
}

#[async_trait]
impl LoginVerifier for HttpLoginVerifier {
    async fn verify(&self, user_id: &str) -> Result<UserProfile> {
        let response = self
            .client
            .get(&self.verify_url)
            .header(USER_ID_HEADER, user_id)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Verification request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Auth(ERR_INVALID_CREDENTIAL.to_string()));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| Error::Http(format!("Failed to parse verification response: {}", e)))
    }
}

/// Verifies the persisted user id. A backend rejection removes the
/// credential so the user is forced to re-authenticate; a transport
/// failure leaves it in place.
pub async fn verify_stored_user(
    store: &CredentialStore,
    verifier: &dyn LoginVerifier,
) -> Result<UserProfile> {
    let user_id = store
        .get(KEY_USER_ID)?
        .ok_or_else(|| Error::Auth(ERR_NO_USER.to_string()))?;

    match verifier.verify(&user_id).await {
        Ok(profile) => Ok(profile),
        Err(Error::Auth(msg)) => {
            if let Err(e) = store.remove(KEY_USER_ID) {
                warn!(error = %e, "Failed to remove rejected credential");
            }
            Err(Error::Auth(msg))
        }
        Err(other) => Err(other),
    }
}
