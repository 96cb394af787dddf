use crate::utils::encode::escape_html;

pub(super) const VERIFICATION_SUBJECT: &str = "Verify your email address";
pub(super) const PASSWORD_RESET_SUBJECT: &str = "Password reset request";

pub(super) fn verification(link: &str) -> String {
    let link = escape_html(link);

    format!(
        r#"<h1>Welcome to Yolo Home!</h1>
<p>Please click the link below to verify your email address:</p>
<a href="{link}" style="padding: 10px 20px; background-color: #4C6FFF; color: white; text-decoration: none; border-radius: 5px;">Verify email</a>
<p>This link expires in 1 hour.</p>
<p>If you cannot click the button, copy and paste this link into your browser:</p>
<p>{link}</p>"#
    )
}

pub(super) fn password_reset(link: &str) -> String {
    let link = escape_html(link);

    format!(
        r#"<h1>Reset your password</h1>
<p>We received a request to reset the password for your account. Please click the link below:</p>
<a href="{link}" style="padding: 10px 20px; background-color: #FF6F61; color: white; text-decoration: none; border-radius: 5px;">Reset password</a>
<p>This link expires in 1 hour and can be used once.</p>
<p>If you did not request a password reset, you can ignore this email.</p>
<p>If you cannot click the button, copy and paste this link into your browser:</p>
<p>{link}</p>"#
    )
}
