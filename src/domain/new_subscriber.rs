use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
}

/// Body accepted by both the signup and the unsubscribe endpoints.
#[derive(Deserialize, Debug)]
pub struct SubscriptionBody {
    pub email: Option<String>,
}

impl TryFrom<SubscriptionBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        let email = body
            .email
            .ok_or_else(|| String::from("email field is missing"))?;
        let email = SubscriberEmail::parse(email)?;

        Ok(NewSubscriber { email })
    }
}
