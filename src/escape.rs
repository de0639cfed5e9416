//! The escape-time kernel.  A point c belongs to the Mandelbrot set
//! when the orbit of z = z² + c, starting from zero, stays bounded
//! forever.  We cannot iterate forever, so the kernel iterates up to
//! a budget and reports how many steps it took the orbit to leave the
//! circle of radius two; an orbit that never leaves within the budget
//! is presumed interior.

use num::Complex;

/// Iterates z = z² + c from zero and returns the step at which the
/// orbit escaped the radius-two circle, or `budget` if it never did.
/// The squares of the two components are carried between steps, so
/// each step costs three multiplications: the escape test
/// `x² + y² <= 4.0` reuses them.
pub fn escape_count(c: Complex<f64>, budget: u32) -> u32 {
    let mut iterations = 0;
    let (mut x, mut y) = (0.0_f64, 0.0_f64);
    let (mut x2, mut y2) = (0.0_f64, 0.0_f64);
    while iterations < budget && x2 + y2 <= 4.0 {
        y = 2.0 * x * y + c.im;
        x = x2 - y2 + c.re;
        x2 = x * x;
        y2 = y * y;
        iterations += 1;
    }
    iterations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_origin_never_escapes() {
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 64), 64);
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 2048), 2048);
    }

    #[test]
    fn the_origin_spends_a_budget_of_one() {
        // The loop body runs once even for the origin: the first test
        // sees x² + y² = 0, and only the count stops a second pass.
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 1), 1);
    }

    #[test]
    fn a_period_two_point_never_escapes() {
        // -1 hops between -1 and 0 forever.
        assert_eq!(escape_count(Complex::new(-1.0, 0.0), 64), 64);
        assert_eq!(escape_count(Complex::new(-1.0, 0.0), 1000), 1000);
    }

    #[test]
    fn a_far_point_escapes_on_the_first_step() {
        assert_eq!(escape_count(Complex::new(2.0, 2.0), 64), 1);
        assert_eq!(escape_count(Complex::new(2.0, 2.0), 1), 1);
    }

    #[test]
    fn a_zero_budget_reports_zero() {
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 0), 0);
        assert_eq!(escape_count(Complex::new(2.0, 2.0), 0), 0);
    }

    #[test]
    fn the_escape_step_is_stable_once_the_budget_covers_it() {
        // Just past the cusp of the cardioid: escapes, but slowly.
        let c = Complex::new(0.26, 0.0);
        let step = escape_count(c, 1000);
        assert!(step < 1000);
        assert_eq!(escape_count(c, 2000), step);
        assert_eq!(escape_count(c, step), step);
        assert_eq!(escape_count(c, step + 1), step);
    }

    #[test]
    fn the_count_is_monotonic_in_the_budget() {
        let c = Complex::new(0.26, 0.0);
        let step = escape_count(c, 1000);
        let mut previous = 0;
        for budget in 0..(step + 10) {
            let count = escape_count(c, budget);
            assert!(count >= previous);
            assert_eq!(count, budget.min(step));
            previous = count;
        }
    }
}
