mod health_check;
mod helpers;
mod stats;
mod subscriptions;
mod unsubscribe;
