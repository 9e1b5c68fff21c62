//! Benchmarking setup for pallet-amm
#![cfg(feature = "runtime-benchmarks")]

use super::*;

#[allow(unused)]
use crate::Pallet as Amm;
use frame_benchmarking::v2::*;
use frame_support::traits::fungibles::{Create, Inspect, Mutate};
use frame_system::RawOrigin;
use sp_runtime::traits::{One, Zero};

const FEE_NUMERATOR: u64 = 3;
const FEE_DENOMINATOR: u64 = 1000;

fn unit<T: Config>() -> AssetBalanceOf<T> {
	1_000_000_000u32.into()
}

/// Creates two sufficient assets and funds `caller` with ten units of each.
fn setup_assets<T: Config>(caller: &T::AccountId) -> (T::AssetId, T::AssetId) {
	let asset_a = T::BenchmarkHelper::asset_id(1);
	let asset_b = T::BenchmarkHelper::asset_id(2);
	frame_system::Pallet::<T>::inc_providers(caller);
	let funds = unit::<T>() * 10u32.into();
	for asset in [asset_a, asset_b] {
		assert!(T::Assets::create(asset, caller.clone(), true, One::one()).is_ok());
		assert!(T::Assets::mint_into(asset, caller, funds).is_ok());
	}
	(asset_a, asset_b)
}

/// Creates a pool funded with one unit of each asset by `caller`.
fn setup_pool<T: Config>(caller: &T::AccountId) -> PoolIdOf<T> {
	let (asset_a, asset_b) = setup_assets::<T>(caller);
	let pool = Amm::<T>::do_create_pool(caller, asset_a, asset_b, FEE_NUMERATOR, FEE_DENOMINATOR)
		.expect("fresh assets make a valid pool");
	let pool_id = pool.pool_id();
	Amm::<T>::do_add_liquidity(
		caller,
		&pool_id,
		unit::<T>(),
		unit::<T>(),
		Zero::zero(),
		Zero::zero(),
		Zero::zero(),
	)
	.expect("caller holds the deposit");
	pool_id
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn create_pool() {
		let caller: T::AccountId = whitelisted_caller();
		let (asset_a, asset_b) = setup_assets::<T>(&caller);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller), asset_a, asset_b, FEE_NUMERATOR, FEE_DENOMINATOR);

		let (pool_id, _, _) = Amm::<T>::identify(asset_a, asset_b).expect("assets differ");
		assert!(Pools::<T>::contains_key(pool_id));
	}

	#[benchmark]
	fn add_liquidity() {
		let caller: T::AccountId = whitelisted_caller();
		let pool_id = setup_pool::<T>(&caller);
		let supply_before = Pools::<T>::get(pool_id).expect("pool exists").claim_supply;

		// proportional deposit, the path every deposit after the first takes
		#[extrinsic_call]
		_(
			RawOrigin::Signed(caller),
			pool_id,
			unit::<T>(),
			unit::<T>() * 2u32.into(),
			Zero::zero(),
			Zero::zero(),
			Zero::zero(),
		);

		assert!(Pools::<T>::get(pool_id).expect("pool exists").claim_supply > supply_before);
	}

	#[benchmark]
	fn remove_liquidity() {
		let caller: T::AccountId = whitelisted_caller();
		let pool_id = setup_pool::<T>(&caller);
		let claim_asset = Pools::<T>::get(pool_id).expect("pool exists").claim_asset;
		let claim = T::Assets::balance(claim_asset, &caller);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), pool_id, claim, Zero::zero(), Zero::zero());

		assert!(T::Assets::balance(claim_asset, &caller).is_zero());
	}

	#[benchmark]
	fn swap() {
		let caller: T::AccountId = whitelisted_caller();
		let pool_id = setup_pool::<T>(&caller);
		let amount_in = unit::<T>() / 1000u32.into();

		#[extrinsic_call]
		_(RawOrigin::Signed(caller), pool_id, amount_in, One::one(), true);

		let pool = Pools::<T>::get(pool_id).expect("pool exists");
		assert!(pool.reserve_low > unit::<T>());
	}

	impl_benchmark_test_suite!(Amm, crate::mock::new_test_ext(), crate::mock::Test);
}
