use askama::Template;

use crate::domain::event::Event;

/// Maximum number of events rendered in one digest.
pub const DIGEST_SIZE: usize = 5;

const BANNER: &str = "Here's what happened on GitHub recently:";

/// Formatted summary of recent activity, rendered once per broadcast cycle and
/// shared read-only by every send of that cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    text: String,
    html: String,
}

#[derive(Template)]
#[template(path = "digest.html")]
struct DigestHtml<'a> {
    banner: &'a str,
    lines: &'a [String],
}

impl Digest {
    /// Renders the first `DIGEST_SIZE` events in the order they were given.
    pub fn from_events(events: &[Event]) -> Result<Digest, askama::Error> {
        let lines: Vec<String> = events.iter().take(DIGEST_SIZE).map(render_line).collect();

        let text = std::iter::once(BANNER.to_string())
            .chain(lines.iter().cloned())
            .collect::<Vec<_>>()
            .join("\n");

        let html = DigestHtml {
            banner: BANNER,
            lines: &lines,
        }
        .render()?;

        Ok(Digest { text, html })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

fn render_line(event: &Event) -> String {
    format!(
        "- {} {} {}",
        event.actor.login,
        event.kind.phrase(),
        event.repo.name
    )
}
