//! Test case lifecycle: `setup` → `run` → `tear_down`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::assertion::{Context, Outcome};

/// A unit of executable test behavior.
///
/// Instances live for the whole process and are shared by reference, so the
/// hooks take `&self`; state that changes across hooks goes behind interior
/// mutability (see [`FixtureCase`]).
pub trait TestCase: Send + Sync {
    /// Runs immediately before [`TestCase::run`].
    ///
    /// An error here is not a test failure: the runner stops the whole run.
    fn setup(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// The test body.
    fn run(&self, cx: &mut Context<'_>) -> Outcome;

    /// Runs after the body, whether it returned normally or aborted.
    fn tear_down(&self) {}
}

/// Signature of a plain test body.
pub type TestFn = fn(&mut Context<'_>) -> Outcome;

/// Test case backed by a plain function with no-op setup and tear-down.
pub struct FnCase {
    body: TestFn,
}

impl FnCase {
    pub const fn new(body: TestFn) -> Self {
        Self { body }
    }
}

impl TestCase for FnCase {
    fn run(&self, cx: &mut Context<'_>) -> Outcome {
        (self.body)(cx)
    }
}

/// Shared environment prepared before, and released after, each body that
/// uses it.
pub trait Fixture: Default + Send + 'static {
    fn setup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn tear_down(&mut self) {}
}

/// Signature of a body that runs against a fixture.
pub type FixtureFn<F> = fn(&mut F, &mut Context<'_>) -> Outcome;

/// Test case that owns one fixture value and runs a body against it.
pub struct FixtureCase<F: Fixture> {
    fixture: Mutex<F>,
    body: FixtureFn<F>,
}

impl<F: Fixture> FixtureCase<F> {
    pub fn new(body: FixtureFn<F>) -> Self {
        Self {
            fixture: Mutex::new(F::default()),
            body,
        }
    }

    fn fixture(&self) -> MutexGuard<'_, F> {
        // A body that panicked poisons the lock; the fixture value is still
        // the one tear-down must see.
        self.fixture.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: Fixture> TestCase for FixtureCase<F> {
    fn setup(&self) -> anyhow::Result<()> {
        self.fixture().setup()
    }

    fn run(&self, cx: &mut Context<'_>) -> Outcome {
        (self.body)(&mut self.fixture(), cx)
    }

    fn tear_down(&self) {
        self.fixture().tear_down()
    }
}
