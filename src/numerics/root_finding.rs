use thiserror::Error;

const MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootError {
    #[error("root is not bracketed: f(a) = {fa}, f(b) = {fb}")]
    NotBracketed { fa: f64, fb: f64 },

    #[error("root finding did not converge in {MAX_ITERATIONS} iterations")]
    MaxIterations,
}

/// Brent's method on `[a, b]` with the end values already known.
///
/// Combines bisection, secant and inverse quadratic interpolation; the
/// bracket is kept at every iteration so convergence is guaranteed for a
/// continuous `f`. Returns once the bracket is narrower than `tol`.
pub fn brent<F>(mut f: F, a: f64, b: f64, fa: f64, fb: f64, tol: f64) -> Result<f64, RootError>
where
    F: FnMut(f64) -> f64,
{
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(RootError::NotBracketed { fa, fb });
    }

    let (mut a, mut b, mut fa, mut fb) = (a, b, fa, fb);
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..MAX_ITERATIONS {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol1 { d } else { tol1.copysign(xm) };
        fb = f(b);
    }

    Err(RootError::MaxIterations)
}
