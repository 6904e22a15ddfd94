use std::sync::Arc;

use portico_lib::{
    address::Address,
    testing::{InMemoryBank, InMemoryPools},
    wrapper::PoolWrapper,
};
use tracing_subscriber::EnvFilter;

/// 100 WETH at 18 decimals, what the user starts with.
pub const WETH_SUPPLY: u128 = 100_000_000_000_000_000_000;
/// 1_000_000 USDC at 6 decimals of lendable pool liquidity.
pub const USDC_LIQUIDITY: u128 = 1_000_000_000_000;

/// A wrapper wired to in-memory collaborators: one registered pool with USDC
/// liquidity, and a user funded with WETH.
pub struct WrapperFixture {
    pub bank: Arc<InMemoryBank>,
    pub pools: Arc<InMemoryPools>,
    pub wrapper: PoolWrapper<Arc<InMemoryBank>, Arc<InMemoryPools>>,
    pub pool: Address,
    pub weth: Address,
    pub usdc: Address,
    pub user: Address,
}

impl WrapperFixture {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
        let bank = Arc::new(InMemoryBank::new());
        let pools = Arc::new(InMemoryPools::new(Arc::clone(&bank)));
        let pool = Address::new_unique();
        let weth = Address::new_unique();
        let usdc = Address::new_unique();
        let user = Address::new_unique();
        pools.register_pool(pool);
        pools.add_liquidity(&pool, &usdc, USDC_LIQUIDITY);
        bank.mint(&weth, &user, WETH_SUPPLY);
        let wrapper = PoolWrapper::new(Arc::clone(&bank), Arc::clone(&pools));
        wrapper.set_lending_pool(pool);
        Self {
            bank,
            pools,
            wrapper,
            pool,
            weth,
            usdc,
            user,
        }
    }

    /// Grants the wrapper an allowance over the user's balance of `asset`.
    pub fn approve(&self, asset: &Address, amount: u128) {
        self.bank.approve(asset, &self.user, amount);
    }
}
