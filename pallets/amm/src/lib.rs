#![cfg_attr(not(feature = "std"), no_std)]

//! # AMM Pallet
//!
//! A two-asset constant product automated market maker.
//!
//! Parties deposit two fungible assets into a shared pool and receive a claim token
//! representing their proportional ownership; traders swap one asset for the other against
//! the pool's reserves at the price set by the reserve ratio.
//!
//! ## Overview
//!
//! - Pools are keyed by a [`PoolId`]: the two asset ids in ascending order. Referencing a pair
//!   in either order always resolves to the same pool.
//! - Each pool owns a dedicated vault account derived from its [`PoolId`]. Reserves are held
//!   there through the [`Config::Assets`] custody interface and always equal the vault's
//!   balances.
//! - The first deposit mints `isqrt(amount_low * amount_high)` claim tokens, of which
//!   [`Config::MinimumLiquidity`] are minted to the vault and locked forever.
//! - Swaps follow `amount_out = in' * reserve_out / (reserve_in + in')` where `in'` is the
//!   input net of the pool fee. The fee stays in the pool, so the product of the reserves
//!   never decreases.
//!
//! ## Dispatchable functions
//!
//! - [`create_pool`](Pallet::create_pool)
//! - [`add_liquidity`](Pallet::add_liquidity)
//! - [`remove_liquidity`](Pallet::remove_liquidity)
//! - [`swap`](Pallet::swap)
//!
//! Each has a `do_*` counterpart for other pallets; it runs inside its own storage layer, so a
//! failed operation leaves neither reserves nor custody balances touched.

pub use pallet::*;
pub use types::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

mod math;
mod types;
pub mod weights;

use frame_support::{traits::fungibles, Blake2_128Concat};

pub(crate) const LOG_TARGET: &str = "runtime::amm";

/// The hasher used by the pallet's storage
pub type Hasher = Blake2_128Concat;

/// Alias for the asset balance type
pub type AssetBalanceOf<T> = <<T as Config>::Assets as fungibles::Inspect<
	<T as frame_system::Config>::AccountId,
>>::Balance;

pub type PoolIdOf<T> = PoolId<<T as Config>::AssetId>;

pub type PoolStateOf<T> = PoolState<<T as Config>::AssetId, AssetBalanceOf<T>>;

#[frame_support::pallet]
pub mod pallet {
	use frame_support::{
		pallet_prelude::*,
		storage::with_storage_layer,
		traits::{
			fungibles::{Create, Inspect, Mutate},
			tokens::{Fortitude, Precision, Preservation},
		},
		PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_runtime::{
		traits::{AccountIdConversion, CheckedAdd, EnsureAdd, EnsureSub, One, Zero},
		ArithmeticError, FixedPointNumber, FixedU128, PerThing, Permill,
	};

	use crate::math::{self, narrow, widen};
	use crate::*;

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	/// Configure the pallet by specifying the parameters and types on which it depends.
	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// Because this pallet emits events, it depends on the runtime's definition of an event.
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Identifier of a fungible asset. The total order decides which side of a pool an
		/// asset lands on; claim token ids are allocated by incrementing it.
		type AssetId: Parameter + MaxEncodedLen + Ord + Copy + CheckedAdd + One;

		/// The custody interface holding every balance the pallet moves.
		type Assets: Inspect<Self::AccountId, AssetId = Self::AssetId>
			+ Mutate<Self::AccountId>
			+ Create<Self::AccountId>;

		/// Seed of the pool vault accounts.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Claim tokens withheld from the first depositor of every pool and locked in the
		/// pool vault.
		#[pallet::constant]
		type MinimumLiquidity: Get<AssetBalanceOf<Self>>;

		/// Highest fee fraction a pool may be created with.
		#[pallet::constant]
		type MaxFee: Get<Permill>;

		/// Highest relative price drop a single swap may cause.
		#[pallet::constant]
		type MaxPriceImpact: Get<Permill>;

		/// The minimum balance of claim token accounts.
		#[pallet::constant]
		type ClaimTokenMinBalance: Get<AssetBalanceOf<Self>>;

		/// Asset id of the first pool's claim token.
		#[pallet::constant]
		type FirstClaimAssetId: Get<Self::AssetId>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;

		#[cfg(feature = "runtime-benchmarks")]
		type BenchmarkHelper: BenchmarkHelper<Self::AssetId>;
	}

	#[pallet::storage]
	pub type Pools<T: Config> = StorageMap<_, Hasher, PoolIdOf<T>, PoolStateOf<T>>;

	/// Asset id the next created pool's claim token receives.
	#[pallet::storage]
	pub type NextClaimAssetId<T: Config> = StorageValue<_, T::AssetId>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// A pool was created and its claim token registered.
		PoolCreated {
			creator: T::AccountId,
			pool_id: PoolIdOf<T>,
			claim_asset: T::AssetId,
			fee_numerator: u64,
			fee_denominator: u64,
		},

		/// Liquidity was deposited and claim tokens minted to the depositor.
		LiquidityAdded {
			who: T::AccountId,
			pool_id: PoolIdOf<T>,
			amount_low: AssetBalanceOf<T>,
			amount_high: AssetBalanceOf<T>,
			claim_minted: AssetBalanceOf<T>,
		},

		/// Claim tokens were burned and the underlying reserves paid out.
		LiquidityRemoved {
			who: T::AccountId,
			pool_id: PoolIdOf<T>,
			amount_low: AssetBalanceOf<T>,
			amount_high: AssetBalanceOf<T>,
			claim_burned: AssetBalanceOf<T>,
		},

		/// One pooled asset was swapped for the other.
		Swapped {
			who: T::AccountId,
			pool_id: PoolIdOf<T>,
			asset_in: T::AssetId,
			asset_out: T::AssetId,
			amount_in: AssetBalanceOf<T>,
			amount_out: AssetBalanceOf<T>,
			fee: AssetBalanceOf<T>,
		},
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Both sides of the pair are the same asset
		IdenticalAssets,

		/// One of the pooled assets is not known to the custody interface
		AssetNotFound,

		/// Fee denominator is zero or smaller than the numerator
		InvalidFeeParameters,

		/// Fee fraction exceeds `MaxFee`
		FeeTooHigh,

		/// A pool for this pair already exists
		PoolAlreadyExists,

		/// No pool exists for this pair
		PoolNotFound,

		/// Zero amount provided
		InvalidAmount,

		/// An intermediate or resulting quantity does not fit the balance type
		MathOverflow,

		/// Low asset amount is below the requested minimum
		InsufficientAmountA,

		/// High asset amount is below the requested minimum
		InsufficientAmountB,

		/// Minted claim tokens are below the requested minimum
		InsufficientLpTokens,

		/// Swap output is below the requested minimum
		SlippageExceeded,

		/// The swap moves the price further than `MaxPriceImpact`
		PriceImpactTooHigh,

		/// The swap would pay out nothing
		NotEnoughOut,

		/// The pool holds no reserves for this operation
		InsufficientLiquidity,

		/// The caller does not hold enough of the asset to spend
		InsufficientBalance,

		/// More claim tokens requested to burn than exist
		BurnTooMuch,

		/// The deposit would mint no claim tokens
		NoPoolMintOutput,

		/// The reserve product decreased across a swap
		InvariantViolated,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state().map_err(Into::into)
		}
	}

	impl<T: Config> From<ArithmeticError> for Error<T> {
		fn from(_: ArithmeticError) -> Self {
			Self::MathOverflow
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Create an empty pool for the pair `asset_a`/`asset_b` charging
		/// `fee_numerator / fee_denominator` of every swap's input.
		///
		/// The asset order is irrelevant. A claim token is registered for the pool and the
		/// pool's vault account is provisioned; no balance moves.
		///
		/// # Errors
		///
		/// - `IdenticalAssets` if `asset_a == asset_b`.
		/// - `AssetNotFound` if either asset is unknown.
		/// - `InvalidFeeParameters` if `fee_denominator` is zero or below `fee_numerator`.
		/// - `FeeTooHigh` if the fee exceeds `MaxFee`.
		/// - `PoolAlreadyExists` if the pair already has a pool.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::create_pool())]
		pub fn create_pool(
			origin: OriginFor<T>,
			asset_a: T::AssetId,
			asset_b: T::AssetId,
			fee_numerator: u64,
			fee_denominator: u64,
		) -> DispatchResult {
			let creator = ensure_signed(origin)?;
			Self::do_create_pool(&creator, asset_a, asset_b, fee_numerator, fee_denominator)?;
			Ok(())
		}

		/// Deposit both pooled assets and receive claim tokens.
		///
		/// The first deposit is taken as-is. Later deposits are scaled down on one side to
		/// match the current reserve ratio.
		///
		/// # Arguments
		///
		/// * `pool_id` - The pool to deposit into.
		/// * `amount_low_desired`, `amount_high_desired` - Upper bounds of the deposit.
		/// * `amount_low_min`, `amount_high_min` - Lower bounds of the deposit actually taken.
		/// * `min_claim_out` - Lower bound of the claim tokens minted.
		///
		/// # Errors
		///
		/// - `InvalidAmount` if a desired amount is zero.
		/// - `InsufficientAmountA`/`InsufficientAmountB` if a used amount is below its minimum.
		/// - `InsufficientLpTokens` if the minted claim is below `min_claim_out`.
		/// - `NoPoolMintOutput` if the deposit would mint nothing.
		/// - `InsufficientBalance` if the caller cannot pay the used amounts.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::add_liquidity())]
		pub fn add_liquidity(
			origin: OriginFor<T>,
			pool_id: PoolIdOf<T>,
			amount_low_desired: AssetBalanceOf<T>,
			amount_high_desired: AssetBalanceOf<T>,
			amount_low_min: AssetBalanceOf<T>,
			amount_high_min: AssetBalanceOf<T>,
			min_claim_out: AssetBalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::do_add_liquidity(
				&who,
				&pool_id,
				amount_low_desired,
				amount_high_desired,
				amount_low_min,
				amount_high_min,
				min_claim_out,
			)?;
			Ok(())
		}

		/// Burn claim tokens and receive the proportional share of both reserves, rounded down.
		///
		/// # Errors
		///
		/// - `InvalidAmount` if `claim_amount_in` is zero.
		/// - `InsufficientBalance` if the caller holds fewer claim tokens.
		/// - `BurnTooMuch` if `claim_amount_in` exceeds the claim supply.
		/// - `InsufficientAmountA`/`InsufficientAmountB` if a payout is below its minimum.
		/// - The custody error if a payout would take the vault below its min balance.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::remove_liquidity())]
		pub fn remove_liquidity(
			origin: OriginFor<T>,
			pool_id: PoolIdOf<T>,
			claim_amount_in: AssetBalanceOf<T>,
			amount_low_min: AssetBalanceOf<T>,
			amount_high_min: AssetBalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::do_remove_liquidity(
				&who,
				&pool_id,
				claim_amount_in,
				amount_low_min,
				amount_high_min,
			)?;
			Ok(())
		}

		/// Swap exactly `amount_in` of one pooled asset for at least `min_amount_out` of the
		/// other. `low_to_high` selects the direction: `true` sells the low asset.
		///
		/// # Errors
		///
		/// - `InvalidAmount` if `amount_in` is zero.
		/// - `InsufficientLiquidity` if the pool holds no reserves.
		/// - `NotEnoughOut` if the output rounds down to zero.
		/// - `SlippageExceeded` if the output is below `min_amount_out`.
		/// - `PriceImpactTooHigh` if the swap moves the price further than `MaxPriceImpact`.
		/// - `InsufficientBalance` if the caller cannot pay `amount_in`.
		/// - The custody error if the output would take the vault below its min balance.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::swap())]
		pub fn swap(
			origin: OriginFor<T>,
			pool_id: PoolIdOf<T>,
			amount_in: AssetBalanceOf<T>,
			min_amount_out: AssetBalanceOf<T>,
			low_to_high: bool,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::do_swap(&who, &pool_id, amount_in, min_amount_out, low_to_high)?;
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Create a pool on behalf of `creator`. See [`Pallet::create_pool`].
		pub fn do_create_pool(
			creator: &T::AccountId,
			asset_a: T::AssetId,
			asset_b: T::AssetId,
			fee_numerator: u64,
			fee_denominator: u64,
		) -> Result<PoolStateOf<T>, DispatchError> {
			with_storage_layer(|| {
				let (pool_id, asset_low, asset_high) = Self::identify(asset_a, asset_b)?;
				ensure!(
					T::Assets::asset_exists(asset_low) && T::Assets::asset_exists(asset_high),
					Error::<T>::AssetNotFound
				);
				Self::ensure_valid_fee(fee_numerator, fee_denominator)?;
				ensure!(!Pools::<T>::contains_key(&pool_id), Error::<T>::PoolAlreadyExists);

				let vault = Self::pool_account(&pool_id);
				let claim_asset = Self::allocate_claim_asset_id()?;

				// The vault must exist to hold assets that are not sufficient on their own.
				frame_system::Pallet::<T>::inc_providers(&vault);
				T::Assets::create(claim_asset, vault, false, T::ClaimTokenMinBalance::get())?;

				let pool = PoolState::new(pool_id, claim_asset, fee_numerator, fee_denominator);
				Pools::<T>::insert(&pool_id, &pool);

				log::debug!(
					target: LOG_TARGET,
					"created pool {:?} with claim asset {:?}, fee {:?}",
					pool_id,
					claim_asset,
					pool.fee(),
				);
				Self::deposit_event(Event::PoolCreated {
					creator: creator.clone(),
					pool_id,
					claim_asset,
					fee_numerator,
					fee_denominator,
				});

				Ok(pool)
			})
		}

		/// Deposit liquidity on behalf of `who`. See [`Pallet::add_liquidity`].
		#[allow(clippy::too_many_arguments)]
		pub fn do_add_liquidity(
			who: &T::AccountId,
			pool_id: &PoolIdOf<T>,
			amount_low_desired: AssetBalanceOf<T>,
			amount_high_desired: AssetBalanceOf<T>,
			amount_low_min: AssetBalanceOf<T>,
			amount_high_min: AssetBalanceOf<T>,
			min_claim_out: AssetBalanceOf<T>,
		) -> Result<LiquidityAddition<AssetBalanceOf<T>>, DispatchError> {
			with_storage_layer(|| {
				ensure!(
					!amount_low_desired.is_zero() && !amount_high_desired.is_zero(),
					Error::<T>::InvalidAmount
				);
				let mut pool = Self::get_pool_state(pool_id)?;
				let addition =
					Self::compute_add_liquidity(&pool, amount_low_desired, amount_high_desired)?;

				ensure!(addition.amount_low >= amount_low_min, Error::<T>::InsufficientAmountA);
				ensure!(addition.amount_high >= amount_high_min, Error::<T>::InsufficientAmountB);
				ensure!(addition.claim_minted >= min_claim_out, Error::<T>::InsufficientLpTokens);
				ensure!(!addition.claim_minted.is_zero(), Error::<T>::NoPoolMintOutput);
				ensure!(
					T::Assets::balance(pool.asset_low, who) >= addition.amount_low &&
						T::Assets::balance(pool.asset_high, who) >= addition.amount_high,
					Error::<T>::InsufficientBalance
				);

				let claim_issued = addition
					.claim_minted
					.ensure_add(addition.claim_locked)
					.map_err(Error::<T>::from)?;
				pool.deposit(addition.amount_low, addition.amount_high, claim_issued)
					.map_err(Error::<T>::from)?;

				let vault = Self::pool_account(pool_id);
				T::Assets::transfer(
					pool.asset_low,
					who,
					&vault,
					addition.amount_low,
					Preservation::Expendable,
				)?;
				T::Assets::transfer(
					pool.asset_high,
					who,
					&vault,
					addition.amount_high,
					Preservation::Expendable,
				)?;
				if !addition.claim_locked.is_zero() {
					T::Assets::mint_into(pool.claim_asset, &vault, addition.claim_locked)?;
				}
				T::Assets::mint_into(pool.claim_asset, who, addition.claim_minted)?;

				Pools::<T>::insert(pool_id, &pool);

				log::debug!(
					target: LOG_TARGET,
					"{:?} added {:?}/{:?} to pool {:?} for {:?} claim",
					who,
					addition.amount_low,
					addition.amount_high,
					pool_id,
					addition.claim_minted,
				);
				Self::deposit_event(Event::LiquidityAdded {
					who: who.clone(),
					pool_id: *pool_id,
					amount_low: addition.amount_low,
					amount_high: addition.amount_high,
					claim_minted: addition.claim_minted,
				});

				Ok(addition)
			})
		}

		/// Withdraw liquidity on behalf of `who`. See [`Pallet::remove_liquidity`].
		///
		/// Returns the paid out `(amount_low, amount_high)`.
		pub fn do_remove_liquidity(
			who: &T::AccountId,
			pool_id: &PoolIdOf<T>,
			claim_amount_in: AssetBalanceOf<T>,
			amount_low_min: AssetBalanceOf<T>,
			amount_high_min: AssetBalanceOf<T>,
		) -> Result<(AssetBalanceOf<T>, AssetBalanceOf<T>), DispatchError> {
			with_storage_layer(|| {
				ensure!(!claim_amount_in.is_zero(), Error::<T>::InvalidAmount);
				let mut pool = Self::get_pool_state(pool_id)?;
				ensure!(
					T::Assets::balance(pool.claim_asset, who) >= claim_amount_in,
					Error::<T>::InsufficientBalance
				);
				ensure!(claim_amount_in <= pool.claim_supply, Error::<T>::BurnTooMuch);

				let (amount_low, amount_high) =
					Self::compute_remove_liquidity(&pool, claim_amount_in)?;
				ensure!(amount_low >= amount_low_min, Error::<T>::InsufficientAmountA);
				ensure!(amount_high >= amount_high_min, Error::<T>::InsufficientAmountB);

				pool.withdraw(amount_low, amount_high, claim_amount_in)
					.map_err(Error::<T>::from)?;

				let vault = Self::pool_account(pool_id);
				T::Assets::burn_from(
					pool.claim_asset,
					who,
					claim_amount_in,
					Precision::Exact,
					Fortitude::Polite,
				)?;
				// The vault keeps its min balance; a payout that would reap it fails.
				if !amount_low.is_zero() {
					T::Assets::transfer(
						pool.asset_low,
						&vault,
						who,
						amount_low,
						Preservation::Preserve,
					)?;
				}
				if !amount_high.is_zero() {
					T::Assets::transfer(
						pool.asset_high,
						&vault,
						who,
						amount_high,
						Preservation::Preserve,
					)?;
				}

				Pools::<T>::insert(pool_id, &pool);

				log::debug!(
					target: LOG_TARGET,
					"{:?} burned {:?} claim of pool {:?} for {:?}/{:?}",
					who,
					claim_amount_in,
					pool_id,
					amount_low,
					amount_high,
				);
				Self::deposit_event(Event::LiquidityRemoved {
					who: who.clone(),
					pool_id: *pool_id,
					amount_low,
					amount_high,
					claim_burned: claim_amount_in,
				});

				Ok((amount_low, amount_high))
			})
		}

		/// Swap on behalf of `who`. See [`Pallet::swap`].
		///
		/// Returns the amount paid out.
		pub fn do_swap(
			who: &T::AccountId,
			pool_id: &PoolIdOf<T>,
			amount_in: AssetBalanceOf<T>,
			min_amount_out: AssetBalanceOf<T>,
			low_to_high: bool,
		) -> Result<AssetBalanceOf<T>, DispatchError> {
			with_storage_layer(|| {
				ensure!(!amount_in.is_zero(), Error::<T>::InvalidAmount);
				let mut pool = Self::get_pool_state(pool_id)?;
				let outcome = Self::compute_swap(&pool, amount_in, low_to_high)?;

				ensure!(outcome.amount_out >= min_amount_out, Error::<T>::SlippageExceeded);
				ensure!(
					outcome.price_impact <= T::MaxPriceImpact::get(),
					Error::<T>::PriceImpactTooHigh
				);

				let (asset_in, asset_out) = pool.assets(low_to_high);
				ensure!(
					T::Assets::balance(asset_in, who) >= amount_in,
					Error::<T>::InsufficientBalance
				);

				let vault = Self::pool_account(pool_id);
				T::Assets::transfer(asset_in, who, &vault, amount_in, Preservation::Expendable)?;
				T::Assets::transfer(
					asset_out,
					&vault,
					who,
					outcome.amount_out,
					Preservation::Preserve,
				)?;

				pool.set_reserves(low_to_high, outcome.reserve_in_after, outcome.reserve_out_after);
				Pools::<T>::insert(pool_id, &pool);

				log::debug!(
					target: LOG_TARGET,
					"{:?} swapped {:?} of {:?} for {:?} of {:?} (fee {:?}, impact {:?})",
					who,
					amount_in,
					asset_in,
					outcome.amount_out,
					asset_out,
					outcome.fee,
					outcome.price_impact,
				);
				Self::deposit_event(Event::Swapped {
					who: who.clone(),
					pool_id: *pool_id,
					asset_in,
					asset_out,
					amount_in,
					amount_out: outcome.amount_out,
					fee: outcome.fee,
				});

				Ok(outcome.amount_out)
			})
		}

		/// Canonical pool identifier of the pair, with the pair's `(low, high)` assets.
		pub fn identify(
			a: T::AssetId,
			b: T::AssetId,
		) -> Result<(PoolIdOf<T>, T::AssetId, T::AssetId), Error<T>> {
			let pool_id = PoolId::new(a, b).ok_or(Error::<T>::IdenticalAssets)?;
			Ok((pool_id, pool_id.low, pool_id.high))
		}

		/// The vault account holding the reserves of `pool_id`.
		pub fn pool_account(pool_id: &PoolIdOf<T>) -> T::AccountId {
			T::PalletId::get().into_sub_account_truncating(pool_id)
		}

		pub fn get_pool_state(pool_id: &PoolIdOf<T>) -> Result<PoolStateOf<T>, Error<T>> {
			Pools::<T>::get(pool_id).ok_or(Error::<T>::PoolNotFound)
		}

		/// What a swap of `amount_in` would currently yield, without slippage or price impact
		/// bounds applied.
		pub fn quote_swap(
			pool_id: &PoolIdOf<T>,
			amount_in: AssetBalanceOf<T>,
			low_to_high: bool,
		) -> Result<SwapOutcome<AssetBalanceOf<T>>, DispatchError> {
			let pool = Self::get_pool_state(pool_id)?;
			Ok(Self::compute_swap(&pool, amount_in, low_to_high)?)
		}

		/// What a deposit of at most the desired amounts would currently take and mint.
		pub fn quote_add_liquidity(
			pool_id: &PoolIdOf<T>,
			amount_low_desired: AssetBalanceOf<T>,
			amount_high_desired: AssetBalanceOf<T>,
		) -> Result<LiquidityAddition<AssetBalanceOf<T>>, DispatchError> {
			let pool = Self::get_pool_state(pool_id)?;
			let addition =
				Self::compute_add_liquidity(&pool, amount_low_desired, amount_high_desired)?;
			ensure!(!addition.claim_minted.is_zero(), Error::<T>::NoPoolMintOutput);
			Ok(addition)
		}

		/// What burning `claim_amount` claim tokens would currently pay out.
		pub fn quote_remove_liquidity(
			pool_id: &PoolIdOf<T>,
			claim_amount: AssetBalanceOf<T>,
		) -> Result<(AssetBalanceOf<T>, AssetBalanceOf<T>), DispatchError> {
			ensure!(!claim_amount.is_zero(), Error::<T>::InvalidAmount);
			let pool = Self::get_pool_state(pool_id)?;
			ensure!(claim_amount <= pool.claim_supply, Error::<T>::BurnTooMuch);
			Ok(Self::compute_remove_liquidity(&pool, claim_amount)?)
		}

		/// Marginal price of `asset` expressed in the other pooled asset.
		pub fn spot_price(
			pool_id: &PoolIdOf<T>,
			asset: T::AssetId,
		) -> Result<FixedU128, DispatchError> {
			let pool = Self::get_pool_state(pool_id)?;
			ensure!(pool_id.contains(&asset), Error::<T>::AssetNotFound);
			let (reserve_asset, reserve_other) = pool.reserves(asset == pool.asset_low);
			let price = FixedU128::checked_from_rational(widen(reserve_other), widen(reserve_asset))
				.ok_or(Error::<T>::InsufficientLiquidity)?;
			Ok(price)
		}

		/// Takes the next claim token id and advances the counter.
		fn allocate_claim_asset_id() -> Result<T::AssetId, Error<T>> {
			let id = NextClaimAssetId::<T>::get().unwrap_or_else(T::FirstClaimAssetId::get);
			let next = id.checked_add(&One::one()).ok_or(Error::<T>::MathOverflow)?;
			NextClaimAssetId::<T>::put(next);
			Ok(id)
		}

		pub(crate) fn ensure_valid_fee(
			fee_numerator: u64,
			fee_denominator: u64,
		) -> Result<(), Error<T>> {
			ensure!(
				fee_denominator > 0 && fee_numerator <= fee_denominator,
				Error::<T>::InvalidFeeParameters
			);
			// numerator / denominator <= parts / ACCURACY, cross-multiplied
			let max_parts = T::MaxFee::get().deconstruct() as u128;
			ensure!(
				(fee_numerator as u128) * (Permill::ACCURACY as u128) <=
					max_parts * (fee_denominator as u128),
				Error::<T>::FeeTooHigh
			);
			Ok(())
		}

		/// Amounts a deposit takes and the claim tokens it mints.
		///
		/// The first deposit into a pool is taken as-is and mints the integer square root of
		/// the deposited product, less the locked minimum liquidity. Later deposits keep all of
		/// one side and scale the other down to the reserve ratio; the claim minted is the
		/// smaller of the two per-side shares.
		pub(crate) fn compute_add_liquidity(
			pool: &PoolStateOf<T>,
			amount_low_desired: AssetBalanceOf<T>,
			amount_high_desired: AssetBalanceOf<T>,
		) -> Result<LiquidityAddition<AssetBalanceOf<T>>, Error<T>> {
			ensure!(
				!amount_low_desired.is_zero() && !amount_high_desired.is_zero(),
				Error::<T>::InvalidAmount
			);

			if pool.claim_supply.is_zero() {
				let root: AssetBalanceOf<T> = narrow(math::sqrt_of_product(
					widen(amount_low_desired),
					widen(amount_high_desired),
				)?)?;
				let locked = T::MinimumLiquidity::get();
				ensure!(root > locked, Error::<T>::NoPoolMintOutput);
				return Ok(LiquidityAddition {
					amount_low: amount_low_desired,
					amount_high: amount_high_desired,
					claim_minted: root.ensure_sub(locked)?,
					claim_locked: locked,
				})
			}

			ensure!(pool.has_liquidity(), Error::<T>::InsufficientLiquidity);
			let reserve_low = widen(pool.reserve_low);
			let reserve_high = widen(pool.reserve_high);
			let supply = widen(pool.claim_supply);
			let low_desired = widen(amount_low_desired);
			let high_desired = widen(amount_high_desired);

			let high_optimal = math::mul_div(low_desired, reserve_high, reserve_low)?;
			let (low_used, high_used) = if high_optimal <= high_desired {
				(low_desired, high_optimal)
			} else {
				let low_optimal = math::mul_div(high_desired, reserve_low, reserve_high)?;
				ensure!(low_optimal <= low_desired, Error::<T>::InvalidAmount);
				(low_optimal, high_desired)
			};

			// Zero for dust deposits; callers reject that after checking the minimums.
			let claim = math::mul_div(low_used, supply, reserve_low)?
				.min(math::mul_div(high_used, supply, reserve_high)?);

			Ok(LiquidityAddition {
				amount_low: narrow(low_used)?,
				amount_high: narrow(high_used)?,
				claim_minted: narrow(claim)?,
				claim_locked: Zero::zero(),
			})
		}

		/// Proportional share of both reserves redeemed by `claim_amount`, rounded down.
		pub(crate) fn compute_remove_liquidity(
			pool: &PoolStateOf<T>,
			claim_amount: AssetBalanceOf<T>,
		) -> Result<(AssetBalanceOf<T>, AssetBalanceOf<T>), Error<T>> {
			ensure!(!pool.claim_supply.is_zero(), Error::<T>::InsufficientLiquidity);
			let claim = widen(claim_amount);
			let supply = widen(pool.claim_supply);

			let amount_low: AssetBalanceOf<T> =
				narrow(math::mul_div(claim, widen(pool.reserve_low), supply)?)?;
			let amount_high: AssetBalanceOf<T> =
				narrow(math::mul_div(claim, widen(pool.reserve_high), supply)?)?;

			Ok((amount_low, amount_high))
		}

		/// Output, fee and post-trade reserves of a swap of `amount_in`.
		///
		/// The fee is taken from the input and retained in the pool:
		/// `amount_out = floor(in' * reserve_out / (reserve_in + in'))` with
		/// `in' = amount_in - floor(amount_in * fee_numerator / fee_denominator)`.
		pub(crate) fn compute_swap(
			pool: &PoolStateOf<T>,
			amount_in: AssetBalanceOf<T>,
			low_to_high: bool,
		) -> Result<SwapOutcome<AssetBalanceOf<T>>, Error<T>> {
			ensure!(!amount_in.is_zero(), Error::<T>::InvalidAmount);
			let (reserve_in, reserve_out) = pool.reserves(low_to_high);
			ensure!(
				!reserve_in.is_zero() && !reserve_out.is_zero(),
				Error::<T>::InsufficientLiquidity
			);

			let gross_in = widen(amount_in);
			let fee = math::mul_div(
				gross_in,
				pool.fee_numerator as u128,
				pool.fee_denominator as u128,
			)?;
			let net_in = gross_in.ensure_sub(fee)?;
			let (wide_in, wide_out) = (widen(reserve_in), widen(reserve_out));
			let amount_out = math::mul_div(net_in, wide_out, wide_in.ensure_add(net_in)?)?;
			ensure!(amount_out > 0, Error::<T>::NotEnoughOut);

			let amount_out: AssetBalanceOf<T> = narrow(amount_out)?;
			let reserve_in_after = reserve_in.ensure_add(amount_in)?;
			let reserve_out_after = reserve_out.ensure_sub(amount_out)?;
			let (wide_in_after, wide_out_after) = (widen(reserve_in_after), widen(reserve_out_after));

			let invariant_before = math::product(wide_in, wide_out)?;
			let invariant_after = math::product(wide_in_after, wide_out_after)?;
			if invariant_after < invariant_before {
				frame_support::defensive!("reserve product decreased across a swap");
				return Err(Error::<T>::InvariantViolated)
			}

			Ok(SwapOutcome {
				amount_out,
				fee: narrow(fee)?,
				price_impact: math::price_impact(wide_in, wide_out, wide_in_after, wide_out_after)?,
				reserve_in_after,
				reserve_out_after,
			})
		}

		/// Checks that every pool's vault balances match its reserves and that the claim
		/// supply matches the claim token's issuance.
		#[cfg(any(feature = "try-runtime", test))]
		pub fn do_try_state() -> Result<(), &'static str> {
			for (pool_id, pool) in Pools::<T>::iter() {
				let vault = Self::pool_account(&pool_id);
				ensure!(
					T::Assets::balance(pool.asset_low, &vault) == pool.reserve_low,
					"low reserve differs from vault balance"
				);
				ensure!(
					T::Assets::balance(pool.asset_high, &vault) == pool.reserve_high,
					"high reserve differs from vault balance"
				);
				ensure!(
					T::Assets::total_issuance(pool.claim_asset) == pool.claim_supply,
					"claim supply differs from claim token issuance"
				);
				ensure!(
					pool.has_liquidity() == !pool.claim_supply.is_zero(),
					"reserves and claim supply disagree on whether the pool holds liquidity"
				);
			}
			Ok(())
		}
	}
}
