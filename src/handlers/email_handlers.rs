use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::handlers::waitlist_dtos::{SendConfirmationRequest, SendPitchConfirmationRequest};
use crate::utils::email_templates;
use crate::utils::mailer::MailTransport;

const NOT_CONFIGURED_MESSAGE: &str =
    "Email service not configured. Please set up SMTP or Gmail credentials.";

/// Waitlist confirmation endpoint. Missing mail configuration reports success
/// with a note so the capture flows are never blocked by it.
pub async fn send_confirmation(
    Json(request): Json<SendConfirmationRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let email = match request.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": "Email is required" })),
            ));
        }
    };
    let Some(transport) = MailTransport::from_env() else {
        tracing::info!(
            "Email service not configured. Confirmation email would be sent to: {}",
            email
        );
        return Ok(Json(json!({
            "success": true,
            "message": NOT_CONFIGURED_MESSAGE,
            "email": email
        })));
    };
    let full_name = request.full_name.as_deref().unwrap_or("");
    match transport
        .send_html(
            &email,
            "You're on the Play It Loud waitlist! 🎉",
            email_templates::waitlist_confirmation_html(full_name),
        )
        .await
    {
        Ok(message_id) => Ok(Json(json!({
            "success": true,
            "message": "Confirmation email sent successfully",
            "messageId": message_id
        }))),
        Err(e) => {
            tracing::error!("Error sending confirmation email: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": format!("Failed to send email: {}", e) })),
            ))
        }
    }
}

/// Pitch confirmation endpoint, same contract shape.
pub async fn send_pitch_confirmation(
    Json(request): Json<SendPitchConfirmationRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let email = match request.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": "Email is required" })),
            ));
        }
    };
    let Some(transport) = MailTransport::from_env() else {
        tracing::info!(
            "Email service not configured. Pitch confirmation email would be sent to: {}",
            email
        );
        return Ok(Json(json!({
            "success": true,
            "message": NOT_CONFIGURED_MESSAGE,
            "email": email
        })));
    };
    let name = request.name.as_deref().unwrap_or("");
    let pitch_title = request.pitch_title.as_deref().unwrap_or("");
    match transport
        .send_html(
            &email,
            "Pitch Submitted Successfully! 🎬",
            email_templates::pitch_confirmation_html(name, pitch_title),
        )
        .await
    {
        Ok(message_id) => Ok(Json(json!({
            "success": true,
            "message": "Pitch confirmation email sent successfully",
            "messageId": message_id
        }))),
        Err(e) => {
            tracing::error!("Error sending pitch confirmation email: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": format!("Failed to send email: {}", e) })),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn missing_email_is_a_bad_request() {
        let (status, body) = send_pitch_confirmation(Json(SendPitchConfirmationRequest {
            email: None,
            name: Some("Ada".to_string()),
            pitch_title: None,
        }))
        .await
        .expect_err("missing email must be rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0["message"], Value::String("Email is required".into()));
    }

    #[tokio::test]
    async fn blank_email_is_a_bad_request() {
        let result = send_confirmation(Json(SendConfirmationRequest {
            email: Some("   ".to_string()),
            full_name: None,
        }))
        .await;
        let (status, _) = result.expect_err("blank email must be rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
