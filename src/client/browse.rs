//! Interactive terminal browser.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::cache::{PostCache, PostSource, UserSessionCache, UserSource};
use crate::config::ClientSettings;

use super::http::{ApiError, HttpClient};
use super::refetch::RefetchCoordinator;
use super::services::{PostService, SimulatedLatency, UserService};
use super::suspense::{ErrorBoundary, Frame, Surface, SuspenseBoundary};
use super::views;

const ERROR_TITLE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error(transparent)]
    Http(#[from] ApiError),
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Refetch,
    Post(String),
    Posts,
    Home,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Self::Empty;
        };
        match (head.to_ascii_lowercase().as_str(), words.next()) {
            ("refetch" | "r", None) => Self::Refetch,
            ("post" | "p", Some(id)) => Self::Post(id.to_string()),
            ("posts", None) => Self::Posts,
            ("home", None) => Self::Home,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

/// Screens and caches for one browsing session.
pub struct Browser<S> {
    coordinator: RefetchCoordinator,
    posts: PostCache,
    surface: S,
}

impl<S: Surface> Browser<S> {
    pub fn new(users: Arc<dyn UserSource>, posts: Arc<dyn PostSource>, surface: S) -> Self {
        Self {
            coordinator: RefetchCoordinator::new(Arc::new(UserSessionCache::new(users))),
            posts: PostCache::new(posts),
            surface,
        }
    }

    pub fn coordinator(&self) -> &RefetchCoordinator {
        &self.coordinator
    }

    pub fn posts(&self) -> &PostCache {
        &self.posts
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Apply one command; `false` once the session should end.
    pub async fn handle(&mut self, command: BrowseCommand) -> bool {
        match command {
            BrowseCommand::Refetch => self.refetch().await,
            BrowseCommand::Post(id) => self.show_post(&id).await,
            BrowseCommand::Posts => self.show_posts().await,
            BrowseCommand::Home => self.show_home().await,
            BrowseCommand::Help => self.surface.paint(Frame::Content(views::help())),
            BrowseCommand::Quit => return false,
            BrowseCommand::Empty => {}
            BrowseCommand::Unknown(input) => self.surface.paint(Frame::Error(format!(
                "unknown command `{input}`; type `help`"
            ))),
        }
        true
    }

    pub async fn refetch(&mut self) {
        match self.coordinator.request_refetch() {
            Some(_) => self.show_home().await,
            None => self
                .surface
                .paint(Frame::Content(views::REFETCH_BUSY_LABEL.to_string())),
        }
    }

    /// Profile screen, rendered from scratch for the current refetch generation.
    pub async fn show_home(&mut self) {
        let key = self.coordinator.render_key(views::PROFILE_COMPONENT);
        debug!(
            target = "folio::client::browse",
            component = key.component,
            generation = key.generation.get(),
            "rendering view"
        );

        let session = Arc::clone(self.coordinator.session());
        let result = SuspenseBoundary::new(key.component)
            .render(&mut self.surface, views::PROFILE_FALLBACK, |scope| {
                let data = scope.read(&session.current_or_fetch())?;
                Ok(views::profile(&data))
            })
            .await;
        ErrorBoundary::new(ERROR_TITLE).catch(&mut self.surface, result);
        self.surface
            .paint(Frame::Content(format!("[{}] type `refetch`", views::REFETCH_LABEL)));
    }

    pub async fn show_post(&mut self, id: &str) {
        let posts = &self.posts;
        let result = SuspenseBoundary::new("post")
            .render(&mut self.surface, views::POST_FALLBACK, |scope| {
                let post = scope.read(&posts.for_post(id))?;
                Ok(views::post_detail(&post))
            })
            .await;
        ErrorBoundary::new(ERROR_TITLE).catch(&mut self.surface, result);
    }

    pub async fn show_posts(&mut self) {
        let posts = &self.posts;
        let result = SuspenseBoundary::new("posts")
            .render(&mut self.surface, views::POST_LIST_FALLBACK, |scope| {
                let list = scope.read(&posts.all_posts())?;
                Ok(views::post_list(&list))
            })
            .await;
        ErrorBoundary::new(ERROR_TITLE).catch(&mut self.surface, result);
    }
}

/// Run the browser against the configured API until `quit` or end of input.
pub async fn run<S: Surface>(settings: &ClientSettings, surface: S) -> Result<(), BrowseError> {
    let http = HttpClient::new(settings.api_url.clone())?;
    let latency = SimulatedLatency::from_settings(settings);
    let users = Arc::new(UserService::new(http.clone(), latency));
    let posts = Arc::new(PostService::new(http, latency));

    info!(
        target = "folio::client::browse",
        api_url = %settings.api_url,
        simulate_latency = settings.simulate_latency,
        "starting browser"
    );

    let mut browser = Browser::new(users, posts, surface);
    browser.handle(BrowseCommand::Help).await;
    browser.handle(BrowseCommand::Home).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !browser.handle(BrowseCommand::parse(&line)).await {
            break;
        }
    }

    info!(target = "folio::client::browse", "browser closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(BrowseCommand::parse("refetch"), BrowseCommand::Refetch);
        assert_eq!(BrowseCommand::parse("  post 7 "), BrowseCommand::Post("7".into()));
        assert_eq!(BrowseCommand::parse("POSTS"), BrowseCommand::Posts);
        assert_eq!(BrowseCommand::parse(""), BrowseCommand::Empty);
        assert_eq!(BrowseCommand::parse("quit"), BrowseCommand::Quit);
        assert_eq!(
            BrowseCommand::parse("post"),
            BrowseCommand::Unknown("post".into())
        );
        assert_eq!(
            BrowseCommand::parse("home now"),
            BrowseCommand::Unknown("home now".into())
        );
    }
}
