//! Widened integer arithmetic shared by the liquidity and swap computations.
//!
//! Every `a * b / c` of the engine is evaluated on `u128` operands with a 256-bit
//! intermediate, so the product never wraps. Results that do not fit back into the
//! balance type surface as [`ArithmeticError::Overflow`].

use sp_arithmetic::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};
use sp_runtime::{
	traits::{IntegerSquareRoot, UniqueSaturatedInto},
	ArithmeticError, PerThing, Permill,
};

/// Lifts a balance into the widened domain.
pub fn widen<B: UniqueSaturatedInto<u128>>(value: B) -> u128 {
	value.unique_saturated_into()
}

/// Narrows a widened value back into the balance type.
pub fn narrow<B: TryFrom<u128>>(value: u128) -> Result<B, ArithmeticError> {
	B::try_from(value).map_err(|_| ArithmeticError::Overflow)
}

/// `floor(a * b / c)`.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, ArithmeticError> {
	if c == 0 {
		return Err(ArithmeticError::DivisionByZero)
	}
	multiply_by_rational_with_rounding(a, b, c, Rounding::Down).ok_or(ArithmeticError::Overflow)
}

/// `a * b`, failing instead of wrapping.
pub fn product(a: u128, b: u128) -> Result<u128, ArithmeticError> {
	a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

/// `floor(sqrt(a * b))`.
pub fn sqrt_of_product(a: u128, b: u128) -> Result<u128, ArithmeticError> {
	Ok(product(a, b)?.integer_sqrt())
}

/// Relative drop of the marginal price `reserve_out / reserve_in` between the two reserve
/// snapshots, rounded up to the next part per million.
///
/// `1 - (out_after * in_before) / (out_before * in_after)`; zero when the price did not drop.
pub fn price_impact(
	reserve_in: u128,
	reserve_out: u128,
	reserve_in_after: u128,
	reserve_out_after: u128,
) -> Result<Permill, ArithmeticError> {
	let before = product(reserve_out, reserve_in_after)?;
	let after = product(reserve_out_after, reserve_in)?;
	let drop = before.saturating_sub(after);
	if drop == 0 {
		return Ok(Permill::zero())
	}
	let parts = multiply_by_rational_with_rounding(
		drop,
		Permill::ACCURACY as u128,
		before,
		Rounding::Up,
	)
	.ok_or(ArithmeticError::DivisionByZero)?;
	Ok(Permill::from_parts(parts.min(Permill::ACCURACY as u128) as u32))
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn mul_div_floors() {
		assert_eq!(mul_div(7, 3, 2), Ok(10));
		assert_eq!(mul_div(1, 1, 3), Ok(0));
		assert_eq!(mul_div(0, u128::MAX, 1), Ok(0));
	}

	#[test]
	fn mul_div_rejects_zero_divisor() {
		assert_eq!(mul_div(1, 1, 0), Err(ArithmeticError::DivisionByZero));
	}

	#[test]
	fn mul_div_survives_products_beyond_128_bits() {
		// (2^127 * 4) / 8 = 2^126, the product itself needs 130 bits
		assert_eq!(mul_div(1 << 127, 4, 8), Ok(1 << 126));
		assert_eq!(mul_div(u128::MAX, u128::MAX, 1), Err(ArithmeticError::Overflow));
	}

	#[test]
	fn narrow_fails_closed() {
		assert_eq!(narrow::<u64>(u64::MAX as u128), Ok(u64::MAX));
		assert_eq!(narrow::<u64>(u64::MAX as u128 + 1), Err(ArithmeticError::Overflow));
	}

	#[test]
	fn sqrt_of_product_floors() {
		assert_eq!(sqrt_of_product(1_000_000_000, 2_000_000_000), Ok(1_414_213_562));
		assert_eq!(sqrt_of_product(u64::MAX as u128, u64::MAX as u128), Ok(u64::MAX as u128));
		assert_eq!(sqrt_of_product(u128::MAX, 2), Err(ArithmeticError::Overflow));
	}

	#[test]
	fn price_impact_of_halving_price_is_half() {
		// price 2/1 -> 1/1
		assert_eq!(price_impact(1, 2, 2, 2), Ok(Permill::from_percent(50)));
		assert_eq!(price_impact(10, 10, 10, 10), Ok(Permill::zero()));
	}

	#[test]
	fn price_impact_rounds_up() {
		// exact impact is 1 - 999_999_999 / 1_000_000_000, a billionth
		assert_eq!(
			price_impact(1_000_000_000, 1_000_000_000, 1_000_000_000, 999_999_999),
			Ok(Permill::from_parts(1))
		);
	}

	proptest! {
		#[test]
		fn mul_div_matches_native_for_64_bit_operands(
			a in any::<u64>(),
			b in any::<u64>(),
			c in 1u64..=u64::MAX,
		) {
			let expected = (a as u128) * (b as u128) / (c as u128);
			prop_assert_eq!(mul_div(a as u128, b as u128, c as u128), Ok(expected));
		}

		#[test]
		fn mul_div_near_u64_max_stays_exact(
			a in (u64::MAX - 1_000_000)..=u64::MAX,
			b in (u64::MAX - 1_000_000)..=u64::MAX,
			c in (u64::MAX - 1_000_000)..=u64::MAX,
		) {
			let expected = (a as u128) * (b as u128) / (c as u128);
			prop_assert_eq!(mul_div(a as u128, b as u128, c as u128), Ok(expected));
		}

		#[test]
		fn sqrt_of_product_is_floor_root(a in any::<u64>(), b in any::<u64>()) {
			let root = sqrt_of_product(a as u128, b as u128).expect("64-bit product fits");
			let product = (a as u128) * (b as u128);
			prop_assert!(root * root <= product);
			prop_assert!((root + 1).checked_mul(root + 1).map_or(true, |next| next > product));
		}
	}
}
