//! Inline HTML bodies for the convenience emails.
//!
//! Placeholders are written `{{name}}` and every substituted value is
//! HTML-escaped.

pub(super) const WELCOME: &str = r#"
<h2>Hello {{name}},</h2>
<p>Welcome to <b>MyService</b>! Explore our amazing features right now.</p>
<p>Best regards,<br/>Team MyService</p>
"#;

pub(super) const PASSWORD_RESET: &str = r#"
<p>You have requested to reset your password.</p>
<p>Click the link below to continue:</p>
<p><a href="{{link}}">{{link}}</a></p>
<p>If you didn't request this, please ignore this email.</p>
"#;

pub(super) const VERIFICATION_CODE: &str = r#"
<h2>Verification Code</h2>
<p>Your verification code is: <strong>{{code}}</strong></p>
<p>This code will expire in 10 minutes.</p>
<p>If you didn't request this code, please ignore this email.</p>
"#;

pub(super) const WARNING_LOGIN: &str = r#"
<h2>Security Alert: New Login Detected</h2>
<p>We detected a new login to your account from a new location.</p>
<p><strong>Location:</strong> {{location}}</p>
<p><strong>Time:</strong> {{time}}</p>
<p>If this was you, you can ignore this message. If you didn't log in recently, please secure your account immediately by changing your password.</p>
"#;

/// Substitutes `{{key}}` placeholders with escaped values in one pass
///
/// Substituted values are never rescanned. Unknown placeholders are kept
/// verbatim.
pub(super) fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(&escape_html(value)),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub(super) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
