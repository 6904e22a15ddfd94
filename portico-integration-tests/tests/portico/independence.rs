use anyhow::Result;
use portico_lib::address::Address;

use crate::fixture::WrapperFixture;

#[test]
fn positions_are_independent_across_users_and_assets() -> Result<()> {
    let fixture = WrapperFixture::new();
    let (weth, usdc, user_a) = (fixture.weth, fixture.usdc, fixture.user);
    let user_b = Address::new_unique();
    let wbtc = Address::new_unique();

    fixture.bank.mint(&weth, &user_b, 5_000);
    fixture.bank.approve(&weth, &user_b, 5_000);
    fixture.bank.mint(&wbtc, &user_a, 3_000);
    fixture.bank.approve(&wbtc, &user_a, 3_000);
    fixture.pools.add_liquidity(&fixture.pool, &weth, 10_000);

    fixture.approve(&weth, 1_000);
    fixture
        .wrapper
        .deposit_and_borrow(&weth, 1_000, &usdc, 100, &user_a)?;
    fixture
        .wrapper
        .deposit_and_borrow(&weth, 2_000, &usdc, 200, &user_b)?;
    fixture
        .wrapper
        .deposit_and_borrow(&wbtc, 3_000, &weth, 300, &user_a)?;

    // Same asset, different user.
    assert_eq!(fixture.wrapper.get_user_deposit_amount(&weth, &user_a), 1_000);
    assert_eq!(fixture.wrapper.get_user_deposit_amount(&weth, &user_b), 2_000);
    // Same user, different asset.
    assert_eq!(fixture.wrapper.get_user_deposit_amount(&wbtc, &user_a), 3_000);
    assert_eq!(fixture.wrapper.get_borrow_amount(&usdc, &user_a), 100);
    assert_eq!(fixture.wrapper.get_borrow_amount(&usdc, &user_b), 200);
    assert_eq!(fixture.wrapper.get_borrow_amount(&weth, &user_a), 300);
    assert_eq!(fixture.wrapper.get_borrow_amount(&weth, &user_b), 0);

    // Unwinding one key leaves the others untouched.
    fixture.bank.approve(&usdc, &user_b, 200);
    fixture
        .wrapper
        .payback_and_withdraw(&weth, 2_000, &usdc, 200, &user_b)?;
    assert_eq!(fixture.wrapper.get_user_deposit_amount(&weth, &user_b), 0);
    assert_eq!(fixture.wrapper.get_user_deposit_amount(&weth, &user_a), 1_000);
    assert_eq!(fixture.wrapper.get_borrow_amount(&usdc, &user_a), 100);
    Ok(())
}
