// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide the monotonic microsecond clock used for benchmark timing.
// Author: Lukas Bower
//! Monotonic microsecond time source.

use crate::mmio::MmioBlock;

/// Monotonically increasing microsecond counter.
pub trait Clock {
    /// Current counter value in microseconds.
    fn now_us(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Elapsed microseconds between two readings of the same clock.
#[inline]
#[must_use]
pub const fn elapsed_us(start: u64, end: u64) -> u64 {
    end.saturating_sub(start)
}

/// Run `f` and return its output with the microseconds it took.
pub fn measure<C, T, F>(clock: &C, f: F) -> (T, u64)
where
    C: Clock + ?Sized,
    F: FnOnce() -> T,
{
    let start = clock.now_us();
    let out = f();
    let end = clock.now_us();
    (out, elapsed_us(start, end))
}

/// Base address of the 1 MHz system timer.
pub const TIMER_BASE: usize = 0x4005_4000;
const TIMERAWH: usize = 0x24;
const TIMERAWL: usize = 0x28;

/// System timer read through its raw (non-latching) high/low registers.
#[derive(Clone, Debug)]
pub struct MmioTimer {
    block: MmioBlock,
}

impl MmioTimer {
    /// Bind to the on-chip timer.
    ///
    /// # Safety
    ///
    /// The timer block must be mapped at [`TIMER_BASE`].
    #[allow(unsafe_code)]
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            block: unsafe { MmioBlock::new(TIMER_BASE) },
        }
    }
}

impl Clock for MmioTimer {
    fn now_us(&self) -> u64 {
        // The low word may carry into the high word between reads.
        loop {
            let hi = self.block.read32(TIMERAWH);
            let lo = self.block.read32(TIMERAWL);
            if self.block.read32(TIMERAWH) == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Steps {
        next: Cell<u64>,
        step: u64,
    }

    impl Clock for Steps {
        fn now_us(&self) -> u64 {
            let now = self.next.get();
            self.next.set(now + self.step);
            now
        }
    }

    #[test]
    fn elapsed_never_underflows() {
        assert_eq!(elapsed_us(10, 25), 15);
        assert_eq!(elapsed_us(25, 10), 0);
    }

    #[test]
    fn measure_reports_bracketed_span() {
        let clock = Steps {
            next: Cell::new(100),
            step: 40,
        };
        let (value, took) = measure(&clock, || 7);
        assert_eq!(value, 7);
        assert_eq!(took, 40);
    }

    #[allow(unsafe_code)]
    #[test]
    fn mmio_timer_combines_high_and_low_words() {
        let mut regs = [0u32; 16];
        regs[TIMERAWH / 4] = 0x2;
        regs[TIMERAWL / 4] = 0x10;
        let timer = MmioTimer {
            block: unsafe { MmioBlock::new(regs.as_mut_ptr() as usize) },
        };
        assert_eq!(timer.now_us(), (2u64 << 32) | 0x10);
    }
}
