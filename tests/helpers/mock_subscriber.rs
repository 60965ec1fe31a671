#![allow(dead_code)]
use anyhow::bail;
use fanout::core::Subscriber;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// A mock subscriber that counts the payloads it has received.
#[derive(Clone, Debug)]
pub struct CountingSubscriber {
    pub name: &'static str,
    pub count: Arc<AtomicUsize>,
}

impl CountingSubscriber {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn received(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<P: ?Sized> Subscriber<P> for CountingSubscriber {
    fn name(&self) -> &str {
        self.name
    }

    fn receive(&self, _payload: &P) -> anyhow::Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A mock subscriber that can be switched into a failing state.
#[derive(Debug, Default)]
pub struct FailableSubscriber {
    pub fail_on_receive: AtomicBool,
    pub received: AtomicUsize,
}

impl FailableSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_receive(&self, fail: bool) {
        self.fail_on_receive.store(fail, Ordering::SeqCst);
    }
}

impl<P: ?Sized> Subscriber<P> for FailableSubscriber {
    fn name(&self) -> &str {
        "failable_mock"
    }

    fn receive(&self, _payload: &P) -> anyhow::Result<()> {
        if self.fail_on_receive.load(Ordering::SeqCst) {
            bail!("mock subscriber configured to fail");
        }
        self.received.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
