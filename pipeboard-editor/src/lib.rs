//! Pipeboard Editor
//!
//! The edit-state model behind the pipeline dashboard.
//!
//! Architecture:
//! - Store: the single state object; every mutation goes through a method that
//!   reports invalid ids instead of ignoring them
//! - Session: loads and saves against the backend, joins the startup fetches
//!   and makes sure only the most recent load is applied
//! - Tabs: which view is active and the data slice each view receives
//! - Notifications: the transient success/error channel shown to the user

pub mod error;
pub mod notification;
pub mod session;
pub mod store;
pub mod tabs;

pub use error::{SessionError, StoreError};
pub use notification::{Notification, NotificationKind};
pub use session::{LoadOutcome, LoadRequest, Session};
pub use store::{LoadTicket, Store};
pub use tabs::{ExecutionStatus, Tab, TabView};
