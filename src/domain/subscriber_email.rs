use validator::validate_email;

/// Normalized (trimmed, lower-cased) address. Sole identity key of a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let normalized = email.trim().to_lowercase();
        let is_valid_email = normalized.contains('@') && validate_email(&normalized);

        if !is_valid_email {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(normalized))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
