//! Plain-text renderings of the browser's screens.

use std::io::Write;

use folio_api_types::{PostResponse, UserWithPostsResponse};
use time::Date;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing::warn;

use super::suspense::{Frame, Surface};

pub const PROFILE_COMPONENT: &str = "profile";
pub const PROFILE_FALLBACK: &str = "Loading profile...";
pub const POST_FALLBACK: &str = "Loading post...";
pub const POST_LIST_FALLBACK: &str = "Loading posts...";
pub const REFETCH_LABEL: &str = "Fetch Random User";
pub const REFETCH_BUSY_LABEL: &str = "Loading...";

const WIRE_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const JOINED_DATE: &[FormatItem<'static>] = format_description!("[month repr:short] [year]");
const PUBLISHED_DATE: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub fn profile(data: &UserWithPostsResponse) -> String {
    let user = &data.user;
    let mut lines = vec![format!("{} ({})", user.name, user.role), user.email.clone()];

    if let Some(bio) = user.bio.as_deref().filter(|bio| !bio.is_empty()) {
        lines.push(String::new());
        lines.push(bio.to_string());
    }

    let mut facts = Vec::new();
    if let Some(location) = user.location.as_deref().filter(|l| !l.is_empty()) {
        facts.push(location.to_string());
    }
    if !user.joined_date.is_empty() {
        facts.push(format!(
            "Joined {}",
            reformat_date(&user.joined_date, JOINED_DATE)
        ));
    }
    if !facts.is_empty() {
        lines.push(facts.join(" | "));
    }

    let mut links = Vec::new();
    if let Some(website) = user.website.as_deref() {
        links.push(format!("Website: {website}"));
    }
    if let Some(github) = user.github.as_deref() {
        links.push(format!("GitHub: https://github.com/{}", github.replace('@', "")));
    }
    if let Some(twitter) = user.twitter.as_deref() {
        links.push(format!("Twitter: https://twitter.com/{}", twitter.replace('@', "")));
    }
    lines.extend(links);

    lines.push(String::new());
    lines.push("Recent Posts".to_string());
    if data.posts.is_empty() {
        lines.push("  (no posts yet)".to_string());
    }
    for post in &data.posts {
        lines.push(format!("  [{}] {}", post.id, post.title));
        lines.push(format!("      {}", post.content));
    }

    lines.join("\n")
}

pub fn post_detail(post: &PostResponse) -> String {
    let mut lines = vec![
        "< Back to Home (type `home`)".to_string(),
        String::new(),
        post.title.clone(),
        format!(
            "by {} | {} | {} min read",
            post.author,
            reformat_date(&post.published_date, PUBLISHED_DATE),
            post.read_time
        ),
    ];
    if !post.tags.is_empty() {
        lines.push(
            post.tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    for paragraph in post.content.split("\n\n") {
        lines.push(String::new());
        lines.push(paragraph.to_string());
    }
    lines.join("\n")
}

pub fn post_list(posts: &[PostResponse]) -> String {
    if posts.is_empty() {
        return "No posts yet.".to_string();
    }
    posts
        .iter()
        .map(|post| {
            format!(
                "[{}] {} ({}, {})",
                post.id, post.title, post.author, post.published_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn help() -> String {
    [
        "Commands:",
        "  refetch     fetch another random user",
        "  post <id>   show a post",
        "  posts       list all posts",
        "  home        show the current profile",
        "  help        show this message",
        "  quit        exit",
    ]
    .join("\n")
}

fn reformat_date(raw: &str, format: &[FormatItem<'_>]) -> String {
    Date::parse(raw, WIRE_DATE)
        .ok()
        .and_then(|date| date.format(format).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Paints frames to stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn paint(&mut self, frame: Frame) {
        let text = match frame {
            Frame::Fallback(text) => text,
            Frame::Content(text) => text,
            Frame::Error(text) => format!("! {text}"),
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{text}").and_then(|()| stdout.flush()) {
            warn!(
                target = "folio::client::views",
                error = %err,
                "failed to write frame to stdout"
            );
        }
    }
}
