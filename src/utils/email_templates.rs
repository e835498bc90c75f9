//! HTML bodies for the confirmation emails. Table layout with inline styles
//! so the usual webmail clients render them consistently.

pub fn waitlist_confirmation_html(full_name: &str) -> String {
    let greeting = if full_name.trim().is_empty() {
        "Hi,".to_string()
    } else {
        format!("Hi {},", full_name.trim())
    };
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>You're on the waitlist - Play It Loud</title>
  </head>
  <body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #ffffff; color: #333333;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
      <tr>
        <td align="center" style="padding: 40px 20px;">
          <table role="presentation" style="max-width: 600px; width: 100%; border-collapse: collapse;">
            <tr>
              <td align="center" style="padding-bottom: 30px;">
                <h1 style="margin: 0; color: #1a0a2e; font-size: 32px; font-weight: bold;">🎬 Play It Loud</h1>
              </td>
            </tr>
            <tr>
              <td style="background-color: #f8f9fa; border-radius: 12px; padding: 40px 30px; border: 1px solid #e9ecef;">
                <h2 style="margin: 0 0 20px 0; color: #1a0a2e; font-size: 24px;">You're on the waitlist! 🎉</h2>
                <p style="margin: 0 0 20px 0; color: #495057; font-size: 16px; line-height: 1.6;">{greeting}</p>
                <p style="margin: 0 0 20px 0; color: #495057; font-size: 16px; line-height: 1.6;">
                  Thanks for signing up. Your spot on the inside is saved - we'll let you know the moment the doors open.
                </p>
                <div style="text-align: center; margin: 30px 0; padding: 20px; background-color: #fff; border-radius: 8px; border: 2px solid #dc3545;">
                  <p style="margin: 0; color: #dc3545; font-size: 18px; font-weight: bold;">Get ready to binge like a boss 🚀</p>
                </div>
                <p style="margin: 20px 0 0 0; color: #6c757d; font-size: 14px; line-height: 1.6;">
                  If you didn't sign up for Play It Loud you can safely ignore this email.
                </p>
              </td>
            </tr>
            <tr>
              <td align="center" style="padding-top: 30px;">
                <p style="margin: 0; color: #6c757d; font-size: 14px;">© 2025 Play It Loud. All rights reserved.</p>
                <p style="margin: 10px 0 0 0; color: #adb5bd; font-size: 12px;">You're receiving this email because you joined the Play It Loud waitlist.</p>
              </td>
            </tr>
          </table>
        </td>
      </tr>
    </table>
  </body>
</html>"#
    )
}

pub fn pitch_confirmation_html(name: &str, pitch_title: &str) -> String {
    let greeting = if name.trim().is_empty() {
        "Hi,".to_string()
    } else {
        format!("Hi {},", name.trim())
    };
    let thanks = if pitch_title.trim().is_empty() {
        "Thank you for submitting your pitch!".to_string()
    } else {
        format!(
            "Thank you for submitting your pitch: <strong>\"{}\"</strong>!",
            pitch_title.trim()
        )
    };
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pitch Submitted - Play It Loud</title>
  </head>
  <body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #ffffff; color: #333333;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
      <tr>
        <td align="center" style="padding: 40px 20px;">
          <table role="presentation" style="max-width: 600px; width: 100%; border-collapse: collapse;">
            <tr>
              <td align="center" style="padding-bottom: 30px;">
                <h1 style="margin: 0; color: #1a0a2e; font-size: 32px; font-weight: bold;">🎬 Play It Loud</h1>
              </td>
            </tr>
            <tr>
              <td style="background-color: #f8f9fa; border-radius: 12px; padding: 40px 30px; border: 1px solid #e9ecef;">
                <h2 style="margin: 0 0 20px 0; color: #1a0a2e; font-size: 24px;">Pitch Submitted Successfully! 🎉</h2>
                <p style="margin: 0 0 20px 0; color: #495057; font-size: 16px; line-height: 1.6;">{greeting}</p>
                <p style="margin: 0 0 20px 0; color: #495057; font-size: 16px; line-height: 1.6;">{thanks}</p>
                <p style="margin: 0 0 20px 0; color: #495057; font-size: 16px; line-height: 1.6;">
                  We've received your submission and our team will review it carefully. We're excited to learn more about your idea and see how we can help bring it to life.
                </p>
                <p style="margin: 0 0 30px 0; color: #495057; font-size: 16px; line-height: 1.6;">
                  <strong style="color: #1a0a2e;">What happens next?</strong><br>
                  Our team will review your pitch and get back to you soon. We typically respond within 2-3 business days.
                </p>
                <div style="text-align: center; margin: 30px 0; padding: 20px; background-color: #fff; border-radius: 8px; border: 2px solid #dc3545;">
                  <p style="margin: 0; color: #dc3545; font-size: 18px; font-weight: bold;">We'll get back to you soon! 🚀</p>
                </div>
                <p style="margin: 20px 0 0 0; color: #6c757d; font-size: 14px; line-height: 1.6;">
                  If you have any questions or need to update your submission, please don't hesitate to contact us.
                </p>
              </td>
            </tr>
            <tr>
              <td align="center" style="padding-top: 30px;">
                <p style="margin: 0; color: #6c757d; font-size: 14px;">© 2025 Play It Loud. All rights reserved.</p>
                <p style="margin: 10px 0 0 0; color: #adb5bd; font-size: 12px;">You're receiving this email because you submitted a pitch to Play It Loud.</p>
              </td>
            </tr>
          </table>
        </td>
      </tr>
    </table>
  </body>
</html>"#
    )
}
