//! Rotation schedule: the 24 rotation amounts that select one linear layer.
//!
//! A Fasta linear layer is fixed by a number `N < T`, where
//! `T = 3^8 * 5^4 * 19^4 * 62^4` counts the distinct layers. The amounts
//! are the digits of `N` in a mixed radix, read least significant first:
//! four base-3 digits for `r1`, four base-3 digits for `r2`, then four
//! digits each in bases 5, 19 and 62 for the rotations applied between
//! Theta iterations. `r3` is derived from `r1` and `r2`.

use std::fmt;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::random::mask_source::MaskSource;
use crate::utils::bit_vector::BitVector;

/// Number of Theta iterations in one linear layer.
pub const THETA_ITERATIONS: usize = 4;

/// Width of the random integer drawn for every linear layer.
pub const RANDOM_INTEGER_BITS: usize = 63;

/// `T = 62^4 * 19^4 * 5^4 * 3^8`, the number of distinct linear layers.
const TRANSFORMATION_COUNT: u64 = 7_896_437_765_612_010_000;

/// Returns `T`, the number of distinct linear layers.
pub fn transformation_count() -> BigUint {
    BigUint::from(TRANSFORMATION_COUNT)
}

/// Rotation amounts for one linear layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationSchedule {
    r1: [usize; THETA_ITERATIONS],
    r2: [usize; THETA_ITERATIONS],
    r3: [usize; THETA_ITERATIONS],
    ii: [usize; THETA_ITERATIONS],
    jj: [usize; THETA_ITERATIONS],
    ll: [usize; THETA_ITERATIONS],
}

/// Successive digits of an integer in a mixed radix.
struct Digits {
    rest: BigUint,
}

impl Digits {
    fn next(&mut self, radix: u32) -> usize {
        let (quotient, remainder) = self.rest.div_rem(&BigUint::from(radix));
        self.rest = quotient;
        // remainder < radix <= 62
        remainder.to_usize().unwrap_or(0)
    }
}

impl RotationSchedule {
    /// Derives the schedule from `n`.
    ///
    /// Only the residue of `n` modulo `T` matters: `fill(n)` and
    /// `fill(n + T)` give the same schedule.
    ///
    /// # Examples
    ///
    /// ```
    /// use fasta::RotationSchedule;
    /// use num_bigint::BigUint;
    ///
    /// let schedule = RotationSchedule::fill(&BigUint::from(0u32));
    /// assert_eq!(schedule.theta_rotations(0), (1, 4, 8));
    /// ```
    pub fn fill(n: &BigUint) -> Self {
        let mut digits = Digits { rest: n.clone() };
        let mut schedule = RotationSchedule::default();

        for r1 in schedule.r1.iter_mut() {
            *r1 = 1 + digits.next(3);
        }
        for i in 0..THETA_ITERATIONS {
            schedule.r2[i] = 4 + digits.next(3);
            schedule.r3[i] = 7 + (2 * schedule.r1[i] + schedule.r2[i] + 1) % 3;
        }
        for ii in schedule.ii.iter_mut() {
            *ii = digits.next(5);
        }
        for jj in schedule.jj.iter_mut() {
            *jj = digits.next(19);
        }
        for ll in schedule.ll.iter_mut() {
            *ll = digits.next(62);
        }
        schedule
    }

    /// Reduces `n` modulo `T`, then fills the schedule.
    pub fn from_integer(n: &BigUint) -> Self {
        Self::fill(&(n % transformation_count()))
    }

    /// Interprets a random bit vector as an integer and derives the schedule.
    pub fn from_draw(bits: &BitVector) -> Self {
        Self::from_integer(&bits.to_biguint())
    }

    /// Draws a 63-bit integer from `source` and derives the schedule.
    pub fn draw<S: MaskSource + ?Sized>(source: &mut S) -> Self {
        Self::from_draw(&source.next_bits(RANDOM_INTEGER_BITS))
    }

    /// Returns the three sum rotations `(r1, r2, r3)` of Theta iteration `k`.
    pub fn theta_rotations(&self, k: usize) -> (usize, usize, usize) {
        (self.r1[k], self.r2[k], self.r3[k])
    }

    /// Returns the rotation of state word `word` (1..=4) after Theta
    /// iteration `k` (0..=2).
    ///
    /// Word `i + 1` moves by `5(i+1) + ii[i]`, `19(i+1) + jj[i]` and
    /// `62(i+1) + ll[i]` after the first, second and third iteration.
    pub fn word_rotation(&self, k: usize, word: usize) -> usize {
        let i = word - 1;
        match k {
            0 => 5 * word + self.ii[i],
            1 => 19 * word + self.jj[i],
            _ => 62 * word + self.ll[i],
        }
    }

    pub fn r1(&self) -> &[usize; THETA_ITERATIONS] {
        &self.r1
    }

    pub fn r2(&self) -> &[usize; THETA_ITERATIONS] {
        &self.r2
    }

    pub fn r3(&self) -> &[usize; THETA_ITERATIONS] {
        &self.r3
    }

    pub fn ii(&self) -> &[usize; THETA_ITERATIONS] {
        &self.ii
    }

    pub fn jj(&self) -> &[usize; THETA_ITERATIONS] {
        &self.jj
    }

    pub fn ll(&self) -> &[usize; THETA_ITERATIONS] {
        &self.ll
    }
}

/// One line, groups separated by `|`; `jj` and `ll` padded to two columns.
impl fmt::Display for RotationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in [&self.r1, &self.r2, &self.r3, &self.ii] {
            for v in group {
                write!(f, "{} ", v)?;
            }
            write!(f, "|")?;
        }
        for group in [&self.jj, &self.ll] {
            for v in group {
                write!(f, "{:2} ", v)?;
            }
            write!(f, "|")?;
        }
        Ok(())
    }
}
