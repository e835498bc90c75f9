use serde::Deserialize;

/// Profile attributes harvested from the identity provider. Fetching these is
/// the only thing the sign-in handshake is used for; no authenticated session
/// outlives the request.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

pub async fn fetch_profile(access_token: &str) -> Result<GoogleProfile, String> {
    let response = reqwest::Client::new()
        .get("https://openidconnect.googleapis.com/v1/userinfo")
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| format!("Userinfo request failed: {}", e))?;
    if !response.status().is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("Userinfo request rejected: {}", error_text));
    }
    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse userinfo response: {}", e))
}

/// Revokes the access token once the profile has been captured. Best-effort;
/// the capture flow already succeeded or failed on its own terms.
pub async fn revoke_token(access_token: &str) {
    let result = reqwest::Client::new()
        .post("https://oauth2.googleapis.com/revoke")
        .query(&[("token", access_token)])
        .send()
        .await;
    if let Err(e) = result {
        tracing::warn!("Failed to revoke access token: {}", e);
    }
}
