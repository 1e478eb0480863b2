use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Square-and-multiply modular exponentiation: `base^exponent mod modulus`.
/// Walks the exponent bits least-significant first, reducing after every
/// multiplication so operands never exceed `modulus^2`.
pub fn mod_exp(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> BigInt {
    debug_assert!(!exponent.is_negative());
    debug_assert!(modulus.is_positive());
    if modulus.is_one() {
        return BigInt::zero();
    }
    let mut a = base % modulus;
    let mut q = exponent.clone();
    let mut r: BigInt = One::one();
    while !q.is_zero() {
        if q.bit(0) {
            r = (r * &a) % modulus;
        }
        q >>= 1;
        a = (&a * &a) % modulus;
    }
    r
}

/// Extended Euclidean algorithm: returns `(g, x, y)` with `a*x + b*y = g`
/// and `g = gcd(a, b)`.
pub fn extended_euclid(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), One::one(), Zero::zero());
    }
    let (g, x, y) = extended_euclid(b, &(a % b));
    (g, y.clone(), x - (a / b) * y)
}

/// Modular inverse of `a` modulo `m`, in `[0, m)`. `None` when
/// `gcd(a, m) != 1` and no inverse exists.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    let (g, x, _) = extended_euclid(a, m);
    if g.is_one() {
        Some(((x % m) + m) % m)
    } else {
        None
    }
}

/// Euler's totient for a two-prime modulus: `(p-1)*(q-1)`.
pub fn euler_totient(p: &BigInt, q: &BigInt) -> BigInt {
    (p - BigInt::one()) * (q - BigInt::one())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_exp_textbook_vector() {
        // The classic worked example: n = 61 * 53, e = 17, d = 2753.
        let n = BigInt::from(3233);
        let c = mod_exp(&BigInt::from(65), &BigInt::from(17), &n);
        assert_eq!(c, BigInt::from(2790));
        let m = mod_exp(&c, &BigInt::from(2753), &n);
        assert_eq!(m, BigInt::from(65));
    }

    #[test]
    fn mod_exp_edges() {
        let n = BigInt::from(97);
        assert_eq!(mod_exp(&BigInt::from(5), &BigInt::zero(), &n), BigInt::one());
        assert_eq!(mod_exp(&BigInt::from(5), &BigInt::from(3), &BigInt::one()), BigInt::zero());
        assert_eq!(mod_exp(&BigInt::from(100), &BigInt::one(), &n), BigInt::from(3));
    }

    #[test]
    fn extended_euclid_bezout() {
        let (g, x, y) = extended_euclid(&BigInt::from(240), &BigInt::from(46));
        assert_eq!(g, BigInt::from(2));
        assert_eq!(BigInt::from(240) * &x + BigInt::from(46) * &y, g);
    }

    #[test]
    fn mod_inverse_of_textbook_exponent() {
        let e = BigInt::from(17);
        let phi = BigInt::from(3120);
        let d = mod_inverse(&e, &phi).unwrap();
        assert_eq!(d, BigInt::from(2753));
        assert_eq!((e * d) % phi, BigInt::one());
    }

    #[test]
    fn mod_inverse_requires_coprimality() {
        assert!(mod_inverse(&BigInt::from(2), &BigInt::from(4)).is_none());
        assert!(mod_inverse(&BigInt::from(6), &BigInt::from(9)).is_none());
    }

    #[test]
    fn totient_of_prime_pair() {
        assert_eq!(euler_totient(&BigInt::from(61), &BigInt::from(53)), BigInt::from(3120));
    }
}
