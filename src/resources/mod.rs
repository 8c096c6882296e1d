//! REST resource wrappers.
//!
//! Each resource borrows the client and maps 1:1 onto the API's verb/path
//! pairs. Responses are returned as raw `serde_json::Value`; the API's
//! response shapes are open-ended and evolve independently of this crate.

mod contacts;
mod exports;
mod links;
mod offers;
mod webhooks;

pub use contacts::Contacts;
pub use exports::Exports;
pub use links::Links;
pub use offers::Offers;
pub use webhooks::{PiiMode, WebhookUpdate, Webhooks};
