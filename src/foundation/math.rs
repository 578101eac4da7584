//! Pure numeric primitives shared by every layout component.
//!
//! All functions are deterministic and total: division by zero and non-finite
//! inputs collapse to the nearest valid bound instead of propagating NaN.

/// The golden ratio, used as a binary split point and aspect target.
pub const PHI: f64 = 1.618033988749895;

/// Global lower bound for any computed scale factor.
pub const SCALE_MIN: f64 = 0.25;

/// Global upper bound for any computed scale factor.
pub const SCALE_MAX: f64 = 4.0;

/// Clamp `v` into `[lo, hi]`, tolerating NaN and inverted bounds.
///
/// A non-finite `v` collapses to `lo`; inverted bounds are reordered.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if !v.is_finite() {
        return lo;
    }
    v.clamp(lo, hi)
}

/// Compute a scale factor for content of `base_size` filling a container,
/// respecting `target_aspect` along the constraining axis.
///
/// The result is bounded to `[SCALE_MIN, SCALE_MAX]`. Degenerate inputs
/// (zero/negative container or base size, non-finite aspect) resolve to the
/// nearest bound of a neutral `1.0` rather than NaN.
pub fn scale_factor(container_w: f64, container_h: f64, base_size: f64, target_aspect: f64) -> f64 {
    let w = sanitize_positive(container_w);
    let h = sanitize_positive(container_h);
    let base = sanitize_positive(base_size);
    let aspect = if target_aspect.is_finite() && target_aspect > 0.0 {
        target_aspect
    } else {
        PHI
    };

    // The constraining dimension is whichever axis the target aspect exhausts
    // first: wide containers are height-bound, tall ones width-bound.
    let constrained = if w / h > aspect { h * aspect } else { w };
    clamp(constrained / base, SCALE_MIN, SCALE_MAX)
}

/// Split `total` at the golden ratio point: `(total/φ, total − total/φ)`.
pub fn golden_split(total: f64) -> (f64, f64) {
    let total = sanitize_non_negative(total);
    let major = total / PHI;
    (major, total - major)
}

/// Split `total` into `n` segments proportional to the first `n` Fibonacci
/// numbers, normalized so the segments sum to exactly `total`.
///
/// The final segment absorbs floating-point drift so the sum is exact.
/// `n == 0` yields an empty vector.
pub fn fibonacci_split(total: f64, n: usize) -> Vec<f64> {
    let total = sanitize_non_negative(total);
    if n == 0 {
        return Vec::new();
    }

    let mut fib = Vec::with_capacity(n);
    let (mut a, mut b) = (1.0f64, 1.0f64);
    for _ in 0..n {
        fib.push(a);
        (a, b) = (b, a + b);
    }
    let sum: f64 = fib.iter().sum();

    let mut out = Vec::with_capacity(n);
    let mut consumed = 0.0;
    for (i, f) in fib.iter().enumerate() {
        if i + 1 == n {
            out.push(total - consumed);
        } else {
            let seg = total * f / sum;
            out.push(seg);
            consumed += seg;
        }
    }
    out
}

/// Round `value` to the nearest multiple of `increment`.
///
/// A zero, negative, or non-finite increment leaves `value` untouched.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if !increment.is_finite() || increment <= 0.0 {
        return value;
    }
    (value / increment).round() * increment
}

fn sanitize_positive(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

fn sanitize_non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}
