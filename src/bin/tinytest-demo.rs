// Sample test binary: one passing and one failing arithmetic test, plus a
// fixture group that shares a counter.

use std::sync::atomic::{AtomicI32, Ordering};

use tinytest::{expect_eq, expect_ge, expect_ok, test_main, Fixture};

tinytest::unit_test!(Math, AddsIntegers, |cx| {
    expect_eq!(cx, 2 + 2, 4);
});

tinytest::unit_test!(Math, SubtractsIntegers, |cx| {
    expect_eq!(cx, 5 - 3, 1);
});

static DEPTH: AtomicI32 = AtomicI32::new(0);

#[derive(Default)]
struct Counter {
    entered: i32,
}

impl Fixture for Counter {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.entered = DEPTH.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(())
    }

    fn tear_down(&mut self) {
        DEPTH.fetch_sub(1, Ordering::SeqCst);
    }
}

tinytest::fixture_test!(Counter, EntersOnce, |counter, cx| {
    expect_eq!(cx, counter.entered, 1);
    expect_eq!(cx, DEPTH.load(Ordering::SeqCst), 1);
});

tinytest::fixture_test!(Counter, ParsesDepth, |counter, cx| {
    expect_ok!(cx, "1".parse::<i32>());
    expect_ge!(cx, counter.entered, 1);
});

test_main!();
