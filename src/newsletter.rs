//! Newsletter dispatch: a [`NewsAgency`] pushes plain-text headlines to its
//! subscribers.

use crate::core::{Sink, Subscriber};
use crate::error::BroadcastError;
use crate::registry::{Registry, SubscriberId};
use anyhow::Result;
use std::sync::Arc;

pub type NewsSubscriber = dyn Subscriber<str>;

#[derive(Default)]
pub struct NewsAgency {
    subscribers: Registry<str>,
}

impl NewsAgency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscriber(&self, subscriber: Arc<NewsSubscriber>) -> SubscriberId {
        self.subscribers.add(subscriber)
    }

    pub fn remove_subscriber<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        self.subscribers.remove(subscriber)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Sends a headline to every subscriber.
    pub fn notify(&self, news: &str) -> Result<usize, BroadcastError> {
        self.subscribers.broadcast(news)
    }
}

fn news_line(channel: &str, news: &str) -> String {
    format!("Sending news via {}: {}", channel, news)
}

pub struct SmsSubscriber {
    sink: Arc<dyn Sink>,
}

impl SmsSubscriber {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<str> for SmsSubscriber {
    fn name(&self) -> &str {
        "sms"
    }

    fn receive(&self, news: &str) -> Result<()> {
        self.sink.emit(&news_line("SMS", news))
    }
}

pub struct EmailSubscriber {
    sink: Arc<dyn Sink>,
}

impl EmailSubscriber {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<str> for EmailSubscriber {
    fn name(&self) -> &str {
        "email"
    }

    fn receive(&self, news: &str) -> Result<()> {
        self.sink.emit(&news_line("email", news))
    }
}

pub struct WebhookSubscriber {
    sink: Arc<dyn Sink>,
}

impl WebhookSubscriber {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<str> for WebhookSubscriber {
    fn name(&self) -> &str {
        "webhook"
    }

    fn receive(&self, news: &str) -> Result<()> {
        self.sink.emit(&news_line("webhook", news))
    }
}
