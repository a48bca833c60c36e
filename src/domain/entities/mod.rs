//! Core business entities.

mod short_url;
mod user;

pub use short_url::{NewShortUrl, ShortUrl, ShortUrlPatch, UrlState};
pub use user::{NewUser, User, UserPatch};
