//! vManage REST Client
//!
//! Session handling and a small set of operations against the Cisco vManage
//! SD-WAN controller.
//!
//! ## Features
//!
//! - **Sessions**: form login, XSRF token and session cookie capture
//! - **Data Fetch**: authenticated GET with `data` envelope unwrapping
//! - **Event Log**: filtered event queries with decoded timestamps and details
//! - **Interface Reset**: device interface reset action
//!
//! ## Example
//!
//! ```rust,no_run
//! use vmanage_client::{Credentials, EventFilter, Session, TransportConfig};
//!
//! # async fn run() -> vmanage_client::Result<()> {
//! let session = Session::establish(
//!     "https://vmanage.example.com:8443",
//!     Credentials::new("admin", "secret"),
//!     &TransportConfig::insecure(),
//! )
//! .await?;
//!
//! let filter = EventFilter::builder()
//!     .hours(4)
//!     .severity("critical")
//!     .build();
//! for event in session.events(&filter).await? {
//!     println!("{:?} {:?}", event.timestamp, event.event_name());
//! }
//!
//! session
//!     .reset_interface("https://vmanage.example.com:8443", "10.255.0.1", 0, "ge0/1")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod events;
mod fetch;
pub mod reset;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{TransportConfig, VManageConfig};
pub use endpoint::BaseUrl;
pub use error::{collapse_line_breaks, collapse_whitespace, Result, VManageError};
pub use events::{EventFilter, EventFilterBuilder, EventQuery, EventRecord, QueryRule};
pub use reset::{InterfaceReset, ERROR_DIALOG_MARKER};
pub use session::{Credentials, Session};
