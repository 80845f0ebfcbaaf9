use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    pub fn new(email: SubscriberEmail) -> Subscriber {
        Subscriber {
            email,
            subscribed_at: Utc::now(),
            is_active: true,
            updated_at: None,
        }
    }
}
