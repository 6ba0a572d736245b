//! Demonstration cases

use anyhow::Context;
use scriptest::{
    assert, assert_equal, assert_not_nil, context, expect, expectation, test_list, wait,
    wait_all, Matcher, TestCase, TestList,
};
use std::thread;
use std::time::Duration;

/// Synchronous expectations
#[derive(Default)]
pub struct Expectations;

impl Expectations {
    async fn test1(&self) -> anyhow::Result<()> {
        expect(1 + 1).to_be(2);
        expect("scriptest".len()).to_match(Matcher::EqualTo(9));
        expect(3).not_to_be(4);
        Ok(())
    }

    async fn test2(&self) -> anyhow::Result<()> {
        expect(context::get()).to_be(Some("_test2".to_string()));
        assert_not_nil(context::get(), "context is set while running");
        Ok(())
    }

    async fn test3(&self) -> anyhow::Result<()> {
        expect(1).to_be(2);
        assert_equal("left", "right", "");
        Ok(())
    }
}

impl TestCase for Expectations {
    fn tests(self) -> TestList {
        test_list![self => test1, test2, test3]
    }
}

/// Completions arriving from other threads
#[derive(Default)]
pub struct Completions {
    delay: Duration,
}

impl Completions {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    async fn background_callback(&self) -> anyhow::Result<()> {
        let done = expectation("background callback");
        let remote = done.clone();
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            remote.fulfill();
        });

        wait(&done, Duration::from_secs(1)).await?;
        assert(done.is_fulfilled(), "callback observed");
        Ok(())
    }

    async fn several_callbacks(&self) -> anyhow::Result<()> {
        let gates: Vec<_> = ["download", "decode", "store"]
            .into_iter()
            .map(|name| expectation(name))
            .collect();
        for gate in &gates {
            let gate = gate.clone();
            thread::spawn(move || gate.fulfill());
        }

        wait_all(&gates, Duration::from_secs(1)).await?;
        assert(true, "all three completed");
        Ok(())
    }

    async fn missed_deadline(&self) -> anyhow::Result<()> {
        let never = expectation("reply that never comes");
        wait(&never, Duration::from_millis(100))
            .await
            .context("waiting for server")?;
        Ok(())
    }
}

impl TestCase for Completions {
    fn tests(self) -> TestList {
        test_list![self => background_callback, several_callbacks, missed_deadline]
    }
}
