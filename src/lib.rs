//! Fan-out of alert notifications to chat-platform webhooks.
//!
//! A [`dispatch::NotificationService`] takes a platform-agnostic alert (or an
//! already platform-shaped one), resolves the sender(s) through a
//! [`router::TargetRouter`], converts the message for each platform and hands
//! it to a [`platform::WebhookSender`], which delivers it in the background.

pub mod config;
pub mod convert;
pub mod dispatch;
pub mod emoji;
pub mod error;
pub mod message;
pub mod platform;
pub mod router;
pub mod scheduler;
