// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide inter-core event and barrier primitives.
// Author: Lukas Bower
//! Inter-core event signalling and memory barriers.
#![allow(unsafe_code)]

use core::sync::atomic::{fence, Ordering};

/// Wake any context parked in [`wait_for_event`].
#[inline(always)]
pub fn signal_event() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        core::arch::asm!("sev", options(nomem, nostack, preserves_flags));
    }
}

/// Park until another context signals an event. Spins on hosts.
#[inline(always)]
pub fn wait_for_event() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        core::arch::asm!("wfe", options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    core::hint::spin_loop();
}

/// Order prior memory writes before a FIFO push.
#[inline(always)]
pub fn fifo_wmb() {
    fence(Ordering::Release);
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        core::arch::asm!("dmb", options(nostack, preserves_flags));
    }
}
