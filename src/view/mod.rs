//! Directory view: navigation state, rendering and action dispatch.

pub mod controller;
pub mod dispatch;
pub mod render;

pub use controller::{DirectoryView, NavigationState, RefreshOutcome};
pub use dispatch::{ActionOutcome, Prompter};
pub use render::{ActionKind, DirectoryListing, Row};
