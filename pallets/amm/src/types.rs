use codec::{Decode, Encode, MaxEncodedLen};
use core::cmp::Ordering;
use scale_info::TypeInfo;
use sp_runtime::{
	traits::{EnsureAdd, EnsureSub, Zero},
	ArithmeticError, Permill, RuntimeDebug,
};

/// Canonical identifier of a liquidity pool.
///
/// Holds the two asset identifiers of the pool in ascending order, so that any two parties
/// referencing the same unordered pair always resolve to the same pool.
#[derive(
	Clone, Copy, PartialEq, Eq, PartialOrd, Ord, RuntimeDebug, Encode, Decode, MaxEncodedLen, TypeInfo,
)]
pub struct PoolId<AssetId> {
	pub low: AssetId,
	pub high: AssetId,
}

impl<AssetId: Ord> PoolId<AssetId> {
	/// Orders `a` and `b` into a pool identifier.
	///
	/// Returns `None` if both identifiers are the same asset.
	pub fn new(a: AssetId, b: AssetId) -> Option<Self> {
		match a.cmp(&b) {
			Ordering::Less => Some(Self { low: a, high: b }),
			Ordering::Greater => Some(Self { low: b, high: a }),
			Ordering::Equal => None,
		}
	}

	/// Whether `asset` is one of the two pooled assets.
	pub fn contains(&self, asset: &AssetId) -> bool {
		&self.low == asset || &self.high == asset
	}
}

/// The canonical record of a pool.
///
/// `reserve_low`/`reserve_high` always equal the balances held by the pool's vault account.
/// `claim_supply` is the total issuance of `claim_asset`, including the permanently locked
/// minimum liquidity held by the vault.
#[derive(Clone, PartialEq, Eq, RuntimeDebug, Encode, Decode, MaxEncodedLen, TypeInfo)]
pub struct PoolState<AssetId, Balance> {
	pub asset_low: AssetId,
	pub asset_high: AssetId,
	pub claim_asset: AssetId,
	pub reserve_low: Balance,
	pub reserve_high: Balance,
	pub claim_supply: Balance,
	pub fee_numerator: u64,
	pub fee_denominator: u64,
}

impl<AssetId: Copy + Ord, Balance: Copy + Zero + EnsureAdd + EnsureSub>
	PoolState<AssetId, Balance>
{
	/// An empty pool: no reserves, no claim tokens in circulation.
	pub fn new(
		pool_id: PoolId<AssetId>,
		claim_asset: AssetId,
		fee_numerator: u64,
		fee_denominator: u64,
	) -> Self {
		Self {
			asset_low: pool_id.low,
			asset_high: pool_id.high,
			claim_asset,
			reserve_low: Zero::zero(),
			reserve_high: Zero::zero(),
			claim_supply: Zero::zero(),
			fee_numerator,
			fee_denominator,
		}
	}

	pub fn pool_id(&self) -> PoolId<AssetId> {
		PoolId { low: self.asset_low, high: self.asset_high }
	}

	/// `(asset_in, asset_out)` for a swap in the given direction.
	pub fn assets(&self, low_to_high: bool) -> (AssetId, AssetId) {
		if low_to_high {
			(self.asset_low, self.asset_high)
		} else {
			(self.asset_high, self.asset_low)
		}
	}

	/// `(reserve_in, reserve_out)` for a swap in the given direction.
	pub fn reserves(&self, low_to_high: bool) -> (Balance, Balance) {
		if low_to_high {
			(self.reserve_low, self.reserve_high)
		} else {
			(self.reserve_high, self.reserve_low)
		}
	}

	pub fn set_reserves(&mut self, low_to_high: bool, reserve_in: Balance, reserve_out: Balance) {
		if low_to_high {
			self.reserve_low = reserve_in;
			self.reserve_high = reserve_out;
		} else {
			self.reserve_high = reserve_in;
			self.reserve_low = reserve_out;
		}
	}

	/// Credits a deposit: both reserves grow and `claim_issued` new claim tokens exist.
	pub fn deposit(
		&mut self,
		amount_low: Balance,
		amount_high: Balance,
		claim_issued: Balance,
	) -> Result<(), ArithmeticError> {
		let reserve_low = self.reserve_low.ensure_add(amount_low)?;
		let reserve_high = self.reserve_high.ensure_add(amount_high)?;
		let claim_supply = self.claim_supply.ensure_add(claim_issued)?;
		self.reserve_low = reserve_low;
		self.reserve_high = reserve_high;
		self.claim_supply = claim_supply;
		Ok(())
	}

	/// Debits a withdrawal: both reserves shrink and `claim_burned` claim tokens are gone.
	pub fn withdraw(
		&mut self,
		amount_low: Balance,
		amount_high: Balance,
		claim_burned: Balance,
	) -> Result<(), ArithmeticError> {
		let reserve_low = self.reserve_low.ensure_sub(amount_low)?;
		let reserve_high = self.reserve_high.ensure_sub(amount_high)?;
		let claim_supply = self.claim_supply.ensure_sub(claim_burned)?;
		self.reserve_low = reserve_low;
		self.reserve_high = reserve_high;
		self.claim_supply = claim_supply;
		Ok(())
	}

	pub fn has_liquidity(&self) -> bool {
		!self.reserve_low.is_zero() && !self.reserve_high.is_zero()
	}

	/// The swap fee as a fraction, rounded down to parts per million.
	pub fn fee(&self) -> Permill {
		Permill::from_rational(self.fee_numerator, self.fee_denominator)
	}
}

/// Outcome of a liquidity deposit computation.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct LiquidityAddition<Balance> {
	/// Amount of the low asset taken from the depositor.
	pub amount_low: Balance,
	/// Amount of the high asset taken from the depositor.
	pub amount_high: Balance,
	/// Claim tokens minted to the depositor.
	pub claim_minted: Balance,
	/// Claim tokens minted to the pool vault and never redeemable. Non-zero only on the first
	/// deposit.
	pub claim_locked: Balance,
}

/// Outcome of a swap computation, before any caller-provided bound is applied.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct SwapOutcome<Balance> {
	pub amount_out: Balance,
	/// Part of the input retained by the pool as fee.
	pub fee: Balance,
	/// Relative drop of the output asset's marginal price caused by the swap.
	pub price_impact: Permill,
	pub reserve_in_after: Balance,
	pub reserve_out_after: Balance,
}

/// Produces asset identifiers for the benchmarks.
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AssetId> {
	fn asset_id(seed: u32) -> AssetId;
}

#[cfg(feature = "runtime-benchmarks")]
impl<AssetId: From<u32>> BenchmarkHelper<AssetId> for () {
	fn asset_id(seed: u32) -> AssetId {
		seed.into()
	}
}
