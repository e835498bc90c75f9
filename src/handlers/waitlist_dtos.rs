use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct WaitlistSignupRequest {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Deserialize)]
pub struct PitchSubmissionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Deserialize)]
pub struct SendConfirmationRequest {
    pub email: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
pub struct SendPitchConfirmationRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "pitchTitle")]
    pub pitch_title: Option<String>,
}
