// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide the numeric kernels timed by the benchmark.
// Author: Lukas Bower
//! Wallis-product approximations of pi.
//!
//! `pi / 2 = prod_{i=1..n} (2i / (2i - 1)) * (2i / (2i + 1))`. The two
//! variants differ only in float width; non-positive counts run no terms.

use bench_proto::KernelVariant;

/// Single-precision Wallis product over `iterations` terms.
#[must_use]
pub fn wallis_f32(iterations: i32) -> f32 {
    let mut product = 1.0f32;
    for i in 1..=iterations {
        let two_i = 2.0 * i as f32;
        product *= two_i / (two_i - 1.0);
        product *= two_i / (two_i + 1.0);
    }
    product * 2.0
}

/// Double-precision Wallis product over `iterations` terms.
#[must_use]
pub fn wallis_f64(iterations: i32) -> f64 {
    let mut product = 1.0f64;
    for i in 1..=iterations {
        let two_i = 2.0 * f64::from(i);
        product *= two_i / (two_i - 1.0);
        product *= two_i / (two_i + 1.0);
    }
    product * 2.0
}

/// Run the kernel named by `variant`.
#[must_use]
pub fn run(variant: KernelVariant, iterations: i32) -> f64 {
    match variant {
        KernelVariant::Single => f64::from(wallis_f32(iterations)),
        KernelVariant::Double => wallis_f64(iterations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_variants_approach_pi() {
        let single = wallis_f32(100_000);
        let double = wallis_f64(100_000);
        assert!((single - core::f32::consts::PI).abs() < 1e-2, "f32 gave {single}");
        assert!((double - core::f64::consts::PI).abs() < 1e-4, "f64 gave {double}");
    }

    #[test]
    fn non_positive_counts_run_no_terms() {
        assert_eq!(wallis_f64(0), 2.0);
        assert_eq!(wallis_f32(-3), 2.0);
    }

    #[test]
    fn dispatch_selects_matching_kernel() {
        assert_eq!(run(KernelVariant::Double, 10), wallis_f64(10));
        assert_eq!(run(KernelVariant::Single, 10), f64::from(wallis_f32(10)));
    }
}
