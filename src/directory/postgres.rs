use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use super::{DirectoryError, SubscriberDirectory};
use crate::domain::{subscriber::Subscriber, subscriber_email::SubscriberEmail};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PostgresSubscriberDirectory {
    db_pool: PgPool,
}

impl PostgresSubscriberDirectory {
    pub fn new(db_pool: PgPool) -> PostgresSubscriberDirectory {
        PostgresSubscriberDirectory { db_pool }
    }
}

fn parse_email(row: &PgRow) -> Result<SubscriberEmail, sqlx::Error> {
    SubscriberEmail::parse(row.try_get("email")?).map_err(|err| sqlx::Error::Decode(err.into()))
}

fn subscriber_from_row(row: PgRow) -> Result<Subscriber, sqlx::Error> {
    Ok(Subscriber {
        email: parse_email(&row)?,
        subscribed_at: row.try_get("subscribed_at")?,
        is_active: row.try_get("is_active")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn store_error(err: sqlx::Error) -> DirectoryError {
    tracing::error!("Failed to execute query: {:?}", err);
    DirectoryError::Store(err)
}

#[async_trait]
impl SubscriberDirectory for PostgresSubscriberDirectory {
    #[tracing::instrument(name = "Check if a subscriber exists", skip(self))]
    async fn exists(&self, email: &SubscriberEmail) -> Result<bool, DirectoryError> {
        // fetch_optional turns "no rows" into None instead of an error
        let row = sqlx::query("SELECT 1 FROM subscribers WHERE email = $1")
            .bind(email.as_ref())
            .fetch_optional(&self.db_pool)
            .await
            .map_err(store_error)?;

        Ok(row.is_some())
    }

    #[tracing::instrument(name = "Find a subscriber by email", skip(self))]
    async fn find(&self, email: &SubscriberEmail) -> Result<Option<Subscriber>, DirectoryError> {
        sqlx::query(
            r#"
            SELECT email, subscribed_at, is_active, updated_at
            FROM subscribers
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .try_map(subscriber_from_row)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(store_error)
    }

    #[tracing::instrument(name = "Insert a new subscriber into the database", skip(self))]
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscriber, DirectoryError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (id, email, subscribed_at, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING email, subscribed_at, is_active, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(Utc::now())
        .try_map(subscriber_from_row)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                DirectoryError::Duplicate(email.to_string())
            }
            err => store_error(err),
        })
    }

    #[tracing::instrument(name = "Update the subscriber active flag", skip(self))]
    async fn set_active(
        &self,
        email: &SubscriberEmail,
        active: bool,
    ) -> Result<(), DirectoryError> {
        sqlx::query(
            r#"
            UPDATE subscribers
            SET is_active = $1, updated_at = $2
            WHERE email = $3
            "#,
        )
        .bind(active)
        .bind(Utc::now())
        .bind(email.as_ref())
        .execute(&self.db_pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    #[tracing::instrument(name = "Get active subscribers", skip(self))]
    async fn list_active(&self) -> Result<Vec<SubscriberEmail>, DirectoryError> {
        sqlx::query(
            r#"
            SELECT email
            FROM subscribers
            WHERE is_active
            ORDER BY subscribed_at, email
            "#,
        )
        .try_map(|row: PgRow| parse_email(&row))
        .fetch_all(&self.db_pool)
        .await
        .map_err(store_error)
    }

    #[tracing::instrument(name = "Count active subscribers", skip(self))]
    async fn count_active(&self) -> Result<i64, DirectoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers WHERE is_active")
            .fetch_one(&self.db_pool)
            .await
            .map_err(store_error)
    }
}
