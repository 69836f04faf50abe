//! Distance functions between two vectors of equal length.
//!
//! Results follow the usual definitions of `scipy.spatial.distance`. A result
//! with an undefined value (a zero norm, an empty input, ...) is `NaN`.
//! Boolean metrics treat every nonzero element as `true`.

use num::Num;

#[inline]
fn pairs<'a, N>(u: &'a [N], v: &'a [N]) -> impl Iterator<Item = (f64, f64)> + 'a
where
    N: Num + Copy + Into<f64>,
{
    u.iter().zip(v).map(|(&a, &b)| (a.into(), b.into()))
}

/// Σ|u_i - v_i| / Σ|u_i + v_i|
pub fn bray_curtis<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    let (diff, sum) = pairs(u, v).fold((0.0, 0.0), |(d, s), (a, b)| (d + (a - b).abs(), s + (a + b).abs()));
    diff / sum
}

/// Σ|u_i - v_i| / (|u_i| + |v_i|), terms with a zero denominator count as 0
pub fn canberra<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    pairs(u, v)
        .map(|(a, b)| {
            let den = a.abs() + b.abs();
            if den == 0.0 {
                0.0
            } else {
                (a - b).abs() / den
            }
        })
        .sum()
}

/// max|u_i - v_i|
pub fn chebyshev<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    pairs(u, v).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max)
}

/// Σ|u_i - v_i|
pub fn city_block<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    pairs(u, v).map(|(a, b)| (a - b).abs()).sum()
}

/// Σ(u_i - v_i)^2
pub fn sq_euclidean<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    pairs(u, v)
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// sqrt(Σ(u_i - v_i)^2)
pub fn euclidean<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    sq_euclidean(u, v).sqrt()
}

/// 1 - u·v / (||u|| ||v||), clipped to [0, 2]
pub fn cosine<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    let (dot, uu, vv) = pairs(u, v).fold((0.0, 0.0, 0.0), |(d, x, y), (a, b)| (d + a * b, x + a * a, y + b * b));
    (1.0 - dot / (uu.sqrt() * vv.sqrt())).clamp(0.0, 2.0)
}

/// Cosine distance of the mean-centered vectors.
pub fn correlation<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    let n = u.len().min(v.len()) as f64;
    let (su, sv) = pairs(u, v).fold((0.0, 0.0), |(x, y), (a, b)| (x + a, y + b));
    let (mu, mv) = (su / n, sv / n);
    let (dot, uu, vv) = pairs(u, v).fold((0.0, 0.0, 0.0), |(d, x, y), (a, b)| {
        let (a, b) = (a - mu, b - mv);
        (d + a * b, x + a * a, y + b * b)
    });
    (1.0 - dot / (uu.sqrt() * vv.sqrt())).clamp(0.0, 2.0)
}

/// Fraction of positions where the elements differ.
pub fn hamming<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    let n = u.len().min(v.len());
    let differ = u.iter().zip(v).filter(|(a, b)| a != b).count();
    differ as f64 / n as f64
}

/// Among positions where either element is nonzero, the fraction where they differ.
/// 0 when both vectors are all zero.
pub fn jaccard<N>(u: &[N], v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    let (differ, nonzero) = u.iter().zip(v).fold((0usize, 0usize), |(d, nz), (a, b)| {
        if a.is_zero() && b.is_zero() {
            (d, nz)
        } else {
            (d + usize::from(a != b), nz + 1)
        }
    });
    if nonzero == 0 {
        0.0
    } else {
        differ as f64 / nonzero as f64
    }
}

/// Truth table of two boolean vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct BoolCounts {
    pub tt: f64,
    pub tf: f64,
    pub ft: f64,
    pub ff: f64,
}

impl BoolCounts {
    pub fn of<N>(u: &[N], v: &[N]) -> Self
    where
        N: Num + Copy,
    {
        let mut c = BoolCounts::default();
        for (a, b) in u.iter().zip(v) {
            match (!a.is_zero(), !b.is_zero()) {
                (true, true) => c.tt += 1.0,
                (true, false) => c.tf += 1.0,
                (false, true) => c.ft += 1.0,
                (false, false) => c.ff += 1.0,
            }
        }
        c
    }

    #[inline]
    fn n(&self) -> f64 {
        self.tt + self.tf + self.ft + self.ff
    }

    #[inline]
    fn differ(&self) -> f64 {
        self.tf + self.ft
    }
}

/// (c_TF + c_FT) / (2 c_TT + c_TF + c_FT)
pub fn dice<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    c.differ() / (2.0 * c.tt + c.differ())
}

/// (c_TF + c_FT - c_TT + n) / (c_TF + c_FT + n)
pub fn kulsinski<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    (c.differ() - c.tt + c.n()) / (c.differ() + c.n())
}

/// (c_TF + c_FT) / n
pub fn matching<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    c.differ() / c.n()
}

/// R / (c_TT + c_FF + R) with R = 2 (c_TF + c_FT).
/// Sokal-Michener is the same quantity.
pub fn rogers_tanimoto<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    let r = 2.0 * c.differ();
    r / (c.tt + c.ff + r)
}

/// (n - c_TT) / n
pub fn russell_rao<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    (c.n() - c.tt) / c.n()
}

/// R / (c_TT + R) with R = 2 (c_TF + c_FT)
pub fn sokal_sneath<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    let r = 2.0 * c.differ();
    r / (c.tt + r)
}

/// 2 c_TF c_FT / (c_TT c_FF + c_TF c_FT), 0 when c_TF c_FT is 0
pub fn yule<N: Num + Copy>(u: &[N], v: &[N]) -> f64 {
    let c = BoolCounts::of(u, v);
    let half_r = c.tf * c.ft;
    if half_r == 0.0 {
        0.0
    } else {
        2.0 * half_r / (c.tt * c.ff + half_r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    const U: [f64; 4] = [1.0, 0.0, 2.0, 3.0];
    const V: [f64; 4] = [0.0, 1.0, 2.0, 1.0];

    #[test]
    fn geometric() {
        assert_eq!(city_block(&U, &V), 4.0);
        assert_eq!(sq_euclidean(&U, &V), 6.0);
        assert!(approx_eq!(f64, euclidean(&U, &V), 6f64.sqrt(), ulps = 2));
        assert_eq!(chebyshev(&U, &V), 2.0);
        // |diff| = 1,1,0,2 ; |sum| = 1,1,4,4
        assert!(approx_eq!(f64, bray_curtis(&U, &V), 0.4, ulps = 2));
        // 1/1 + 1/1 + 0/4 + 2/4
        assert!(approx_eq!(f64, canberra(&U, &V), 2.5, ulps = 2));
    }

    #[test]
    fn canberra_skips_double_zero() {
        assert_eq!(canberra(&[0.0, 1.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_and_correlation() {
        assert!(approx_eq!(f64, cosine(&[1.0, 1.0, 0.0], &[1.0, 0.0, 1.0]), 0.5, ulps = 4));
        assert!(approx_eq!(f64, cosine(&[1.0, 2.0], &[2.0, 4.0]), 0.0, epsilon = 1e-12));
        assert!(cosine(&[0.0, 0.0], &[1.0, 0.0]).is_nan());
        assert!(approx_eq!(f64, correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), 2.0, ulps = 4));
        assert!(approx_eq!(f64, correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 0.0, epsilon = 1e-12));
    }

    #[test]
    fn integer_inputs() {
        let a: [u32; 3] = [1, 2, 3];
        let b: [u32; 3] = [1, 0, 3];
        assert_eq!(city_block(&a, &b), 2.0);
        assert!(approx_eq!(f64, hamming(&a, &b), 1.0 / 3.0, ulps = 2));
    }

    #[test]
    fn boolean_family() {
        // tt = 1, tf = 1, ft = 1, ff = 1
        let u = [1.0, 1.0, 0.0, 0.0];
        let v = [1.0, 0.0, 1.0, 0.0];
        assert!(approx_eq!(f64, dice(&u, &v), 0.5, ulps = 2));
        assert!(approx_eq!(f64, kulsinski(&u, &v), 5.0 / 6.0, ulps = 2));
        assert!(approx_eq!(f64, matching(&u, &v), 0.5, ulps = 2));
        assert!(approx_eq!(f64, rogers_tanimoto(&u, &v), 4.0 / 6.0, ulps = 2));
        assert!(approx_eq!(f64, russell_rao(&u, &v), 0.75, ulps = 2));
        assert!(approx_eq!(f64, sokal_sneath(&u, &v), 0.8, ulps = 2));
        assert!(approx_eq!(f64, yule(&u, &v), 1.0, ulps = 2));
        assert_eq!(yule(&u, &u), 0.0);
    }

    #[test]
    fn jaccard_ignores_shared_zeros() {
        assert!(approx_eq!(f64, jaccard(&[1.0, 0.0, 2.0, 0.0], &[1.0, 3.0, 0.0, 0.0]), 2.0 / 3.0, ulps = 2));
        assert_eq!(jaccard(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }
}
