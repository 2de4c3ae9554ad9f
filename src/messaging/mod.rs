//! Topic publishing
//!
//! [`TopicPublisher`] marshals typed messages into JSON envelopes and
//! forwards them through a [`TopicSender`]; [`RestTopicSender`] implements
//! the capability against the Service Bus REST endpoint.

pub mod publisher;
pub mod rest;

pub use publisher::{TopicPublisher, TopicSender, CONTENT_TYPE_JSON};
pub use rest::RestTopicSender;
