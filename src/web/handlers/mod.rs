//! HTML template rendering and form handlers for the web dashboard.

mod dashboard;
mod links;
mod login;

pub use dashboard::dashboard_handler;
pub use links::{create_link_handler, delete_link_handler};
pub use login::{login_page_handler, login_submit_handler, logout_handler};
