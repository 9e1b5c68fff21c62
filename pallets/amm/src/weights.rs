//! Weights for pallet_amm
//!
//! PLACEHOLDER VALUES. These are hand-set upper estimates, not benchmark output. Replace this
//! file with the output of `benchmark pallet --pallet=pallet_amm --extrinsic=*` run against the
//! target runtime before deploying.

#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

/// Weight functions needed for pallet_amm.
pub trait WeightInfo {
	fn create_pool() -> Weight;
	fn add_liquidity() -> Weight;
	fn remove_liquidity() -> Weight;
	fn swap() -> Weight;
}

// Read/write counts are the storage items each call touches: the pool entry, the claim asset
// counter, asset metadata, per-account asset balances, and the vault's system account.
const CREATE_POOL_BASE: u64 = 50_000_000;
const ADD_LIQUIDITY_BASE: u64 = 150_000_000;
const REMOVE_LIQUIDITY_BASE: u64 = 150_000_000;
const SWAP_BASE: u64 = 100_000_000;
const PROOF_SIZE: u64 = 32_768;

/// Placeholder weights for pallet_amm, parameterized over the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn create_pool() -> Weight {
		Weight::from_parts(CREATE_POOL_BASE, PROOF_SIZE)
			.saturating_add(T::DbWeight::get().reads(6_u64))
			.saturating_add(T::DbWeight::get().writes(4_u64))
	}
	fn add_liquidity() -> Weight {
		Weight::from_parts(ADD_LIQUIDITY_BASE, PROOF_SIZE)
			.saturating_add(T::DbWeight::get().reads(11_u64))
			.saturating_add(T::DbWeight::get().writes(11_u64))
	}
	fn remove_liquidity() -> Weight {
		Weight::from_parts(REMOVE_LIQUIDITY_BASE, PROOF_SIZE)
			.saturating_add(T::DbWeight::get().reads(9_u64))
			.saturating_add(T::DbWeight::get().writes(9_u64))
	}
	fn swap() -> Weight {
		Weight::from_parts(SWAP_BASE, PROOF_SIZE)
			.saturating_add(T::DbWeight::get().reads(7_u64))
			.saturating_add(T::DbWeight::get().writes(7_u64))
	}
}

// For backwards compatibility and tests
impl WeightInfo for () {
	fn create_pool() -> Weight {
		Weight::from_parts(CREATE_POOL_BASE, PROOF_SIZE)
			.saturating_add(RocksDbWeight::get().reads(6_u64))
			.saturating_add(RocksDbWeight::get().writes(4_u64))
	}
	fn add_liquidity() -> Weight {
		Weight::from_parts(ADD_LIQUIDITY_BASE, PROOF_SIZE)
			.saturating_add(RocksDbWeight::get().reads(11_u64))
			.saturating_add(RocksDbWeight::get().writes(11_u64))
	}
	fn remove_liquidity() -> Weight {
		Weight::from_parts(REMOVE_LIQUIDITY_BASE, PROOF_SIZE)
			.saturating_add(RocksDbWeight::get().reads(9_u64))
			.saturating_add(RocksDbWeight::get().writes(9_u64))
	}
	fn swap() -> Weight {
		Weight::from_parts(SWAP_BASE, PROOF_SIZE)
			.saturating_add(RocksDbWeight::get().reads(7_u64))
			.saturating_add(RocksDbWeight::get().writes(7_u64))
	}
}
