//! Browser-facing plumbing: cookies, flash messages, page rendering and redirects.
pub mod cookies;
pub mod flash;
pub mod page;

pub const LOGIN_PATH: &str = "/login/";
pub const LOGOUT_PATH: &str = "/logout/";
pub const HOME_PATH: &str = "/";
pub const NO_PRIVILEGES_PATH: &str = "/no-privileges/";
