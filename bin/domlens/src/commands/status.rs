use domlens_coordinator::{verify_stored_user, HttpLoginVerifier, ERR_VERIFY_FAILED};
use domlens_core::{Config, Error, Paths};
use domlens_storage::{CredentialStore, KEY_AUTH_TOKEN, KEY_USER_ID};

pub async fn run() -> anyhow::Result<()> {
    let paths = Paths::new();

    println!("domlens status");
    println!("==============");
    println!();

    let config_path = paths.config_file();
    println!(
        "Config:      {} {}",
        config_path.display(),
        if config_path.exists() { "ok" } else { "(defaults)" }
    );

    let config = Config::load_or_default(&paths)?;
    println!("Allow-list:  {}", config.allowed_urls.join(", "));

    let store = CredentialStore::new(paths);
    let has_token = store.get(KEY_AUTH_TOKEN)?.is_some();
    println!("Auth token:  {}", if has_token { "present" } else { "absent" });

    match store.get(KEY_USER_ID)? {
        None => {
            println!("Sign-in:     not signed in");
        }
        Some(user_id) => {
            println!("Sign-in:     {} (verifying...)", user_id);
            let verifier = HttpLoginVerifier::new(&config.auth)?;
            match verify_stored_user(&store, &verifier).await {
                Ok(profile) => {
                    let plan = profile.plan.as_deref().unwrap_or("hobby");
                    println!("Verified:    {} ({})", profile.display_name(), plan);
                }
                Err(Error::Auth(msg)) => {
                    // the rejected credential has already been removed
                    println!("Verified:    no. {}", msg);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "verification transport failure");
                    println!("Verified:    no. {}", ERR_VERIFY_FAILED);
                }
            }
        }
    }
    Ok(())
}
