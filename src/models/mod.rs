//! Message models shared by the services and their provider adapters.
//!
//! Each channel has exactly one canonical message shape. Required fields are
//! checked with `validator` before any adapter is invoked.

mod channel;
mod email;
mod notify;
mod receipt;
mod sms;

pub use channel::Channel;
pub use email::Email;
pub use notify::{Content, Level, ParseMode};
pub use receipt::DeliveryReceipt;
pub use sms::Sms;
