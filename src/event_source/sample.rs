use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::domain::event::{Actor, Event, EventKind, Repo};

const SAMPLE_ACTORS: [&str; 6] = [
    "octocat",
    "torvalds",
    "gaearon",
    "sindresorhus",
    "yyx990803",
    "dtolnay",
];

const SAMPLE_REPOS: [&str; 6] = [
    "rust-lang/rust",
    "tokio-rs/tokio",
    "actix/actix-web",
    "serde-rs/serde",
    "facebook/react",
    "microsoft/vscode",
];

/// Builds `count` synthetic events, the i-th one dated `i` hours before `now`.
pub fn sample_events<R: Rng + ?Sized>(
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Event> {
    (0..count)
        .map(|offset| {
            let kind_index = rng.gen_range(0..EventKind::INTERESTING.len());
            let kind = EventKind::INTERESTING[kind_index].clone();
            let login = SAMPLE_ACTORS[rng.gen_range(0..SAMPLE_ACTORS.len())];
            let repo = SAMPLE_REPOS[rng.gen_range(0..SAMPLE_REPOS.len())];

            Event {
                kind,
                actor: Actor {
                    login: String::from(login),
                },
                repo: Repo {
                    name: String::from(repo),
                },
                created_at: now - Duration::hours(offset as i64),
            }
        })
        .collect()
}
