//! Terminal client: HTTP services, suspense rendering and the browser loop.

pub mod browse;
pub mod http;
pub mod refetch;
pub mod services;
pub mod suspense;
pub mod views;

pub use browse::{BrowseCommand, BrowseError, Browser};
pub use http::{ApiError, HttpClient};
pub use refetch::{Generation, RefetchCoordinator, RefetchState, RenderKey};
pub use services::{PostService, SimulatedLatency, UserService};
pub use suspense::{
    ErrorBoundary, Frame, Interrupt, RecordingSurface, RenderError, RenderScope, Surface,
    SuspenseBoundary,
};
pub use views::TerminalSurface;
