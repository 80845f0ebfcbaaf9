use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity type as reported by the upstream feed (`PushEvent`, `ForkEvent`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Push,
    Create,
    Watch,
    Fork,
    Issues,
    PullRequest,
    Release,
    Public,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub actor: Actor,
    pub repo: Repo,
    pub created_at: DateTime<Utc>,
}

impl EventKind {
    /// Kinds worth putting in a digest.
    pub const INTERESTING: [EventKind; 7] = [
        EventKind::Push,
        EventKind::Create,
        EventKind::Watch,
        EventKind::Fork,
        EventKind::PullRequest,
        EventKind::Issues,
        EventKind::Release,
    ];

    pub fn is_interesting(&self) -> bool {
        Self::INTERESTING.contains(self)
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Push => "PushEvent",
            EventKind::Create => "CreateEvent",
            EventKind::Watch => "WatchEvent",
            EventKind::Fork => "ForkEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::Release => "ReleaseEvent",
            EventKind::Public => "PublicEvent",
            EventKind::Other(kind) => kind,
        }
    }

    /// Present-tense phrase used in the digest line.
    pub fn phrase(&self) -> &'static str {
        match self {
            EventKind::Push => "pushed to",
            EventKind::Create => "created",
            EventKind::Watch => "starred",
            EventKind::Fork => "forked",
            EventKind::Issues => "opened issue in",
            EventKind::PullRequest => "created pull request in",
            EventKind::Release => "published a release in",
            EventKind::Public => "made public",
            EventKind::Other(_) => "had activity in",
        }
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "PushEvent" => EventKind::Push,
            "CreateEvent" => EventKind::Create,
            "WatchEvent" => EventKind::Watch,
            "ForkEvent" => EventKind::Fork,
            "IssuesEvent" => EventKind::Issues,
            "PullRequestEvent" => EventKind::PullRequest,
            "ReleaseEvent" => EventKind::Release,
            "PublicEvent" => EventKind::Public,
            _ => EventKind::Other(kind),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(kind) => kind,
            known => known.as_str().to_owned(),
        }
    }
}
