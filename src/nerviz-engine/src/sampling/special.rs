// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::f64::consts::PI;

// Lanczos approximation, g = 7, n = 9.
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of |Γ(x)|.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // reflection: Γ(x)Γ(1-x) = π / sin(πx)
        return (PI / (PI * x).sin()).abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = LANCZOS_COEFFICIENTS[0];
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// `a * ln(x)`, taken as 0 when `a` is 0 so that `x^0` stays 1 at `x = 0`.
pub fn xlogy(a: f64, x: f64) -> f64 {
    if a == 0.0 { 0.0 } else { a * x.ln() }
}

/// ln of the binomial coefficient C(n, k).
pub fn ln_choose(n: f64, k: f64) -> f64 {
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn gamma(x: f64) -> f64 {
        ln_gamma(x).exp()
    }

    #[test]
    fn test_gamma_factorials() {
        let mut factorial = 1.0;
        for n in 1..15 {
            assert!(approx_eq!(f64, gamma(n as f64), factorial, epsilon = 1e-9 * factorial));
            factorial *= n as f64;
        }
    }

    #[test]
    fn test_gamma_half() {
        assert!(approx_eq!(f64, gamma(0.5), PI.sqrt(), epsilon = 1e-12));
        assert!(approx_eq!(f64, gamma(1.5), PI.sqrt() / 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_xlogy_zero_exponent() {
        assert_eq!(xlogy(0.0, 0.0), 0.0);
        assert_eq!(xlogy(1.0, 0.0), f64::NEG_INFINITY);
        assert!(approx_eq!(f64, xlogy(2.0, std::f64::consts::E), 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_ln_choose() {
        assert!(approx_eq!(f64, ln_choose(10.0, 3.0).exp(), 120.0, epsilon = 1e-8));
        assert!(approx_eq!(f64, ln_choose(5.0, 0.0).exp(), 1.0, epsilon = 1e-12));
    }
}
