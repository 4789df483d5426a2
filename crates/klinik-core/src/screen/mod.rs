//! Screens as plain state machines.
//!
//! Each screen owns its view state and is driven by method calls. Operations
//! that need the network take the [`AppContext`](crate::AppContext) and
//! return a [`ScreenEffect`] for the shell to act on.

mod collection;
mod dashboard;
mod delete;
mod entity;
mod filter;
mod form;
mod list;
mod login;
mod ops;
mod profile;
mod shell;

pub use dashboard::*;
pub use delete::*;
pub use entity::*;
pub use filter::*;
pub use form::*;
pub use list::*;
pub use login::*;
pub use ops::*;
pub use profile::*;
pub use shell::*;
