mod client;
pub mod models;
pub mod time;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{CalendarSummary, ExternalEvent};
pub use time::HarvestWindow;
pub use token::{AccessTokenProvider, TokenManager};
