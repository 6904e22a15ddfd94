use portico_lib::event::WrapperEvent;

use crate::fixture::{WrapperFixture, WETH_SUPPLY};

// Amounts from the reference scenario: 20 WETH of collateral against a
// 500 USDC borrow.
const COLLATERAL: u128 = 20_000_000_000_000_000_000;
const BORROW: u128 = 500_000_000;

#[test]
fn deposit_and_borrow_then_payback_and_withdraw() {
    let fixture = WrapperFixture::new();
    let (weth, usdc, user) = (fixture.weth, fixture.usdc, fixture.user);

    fixture.approve(&weth, COLLATERAL);
    fixture
        .wrapper
        .deposit_and_borrow(&weth, COLLATERAL, &usdc, BORROW, &user)
        .unwrap();

    assert_eq!(
        fixture.wrapper.get_user_deposit_amount(&weth, &user),
        COLLATERAL
    );
    assert_eq!(fixture.wrapper.get_borrow_amount(&usdc, &user), BORROW);
    // Collateral moved into pool custody, borrowed funds reached the user.
    assert_eq!(
        fixture.bank.balance_of(&weth, &user),
        WETH_SUPPLY - COLLATERAL
    );
    assert_eq!(fixture.bank.balance_of(&usdc, &user), BORROW);
    assert_eq!(
        fixture.pools.supplied(&fixture.pool, &weth, &user),
        COLLATERAL
    );

    fixture.approve(&usdc, BORROW);
    fixture
        .wrapper
        .payback_and_withdraw(&weth, COLLATERAL, &usdc, BORROW, &user)
        .unwrap();

    assert_eq!(fixture.wrapper.get_user_deposit_amount(&weth, &user), 0);
    assert_eq!(fixture.wrapper.get_borrow_amount(&usdc, &user), 0);
    assert_eq!(fixture.bank.balance_of(&weth, &user), WETH_SUPPLY);
    assert_eq!(fixture.bank.balance_of(&usdc, &user), 0);
    assert_eq!(fixture.pools.supplied(&fixture.pool, &weth, &user), 0);
    assert_eq!(fixture.pools.borrowed(&fixture.pool, &usdc, &user), 0);
}

#[test]
fn roundtrip_accumulates_over_prior_balances() {
    let fixture = WrapperFixture::new();
    let (weth, usdc, user) = (fixture.weth, fixture.usdc, fixture.user);

    fixture.approve(&weth, COLLATERAL);
    fixture
        .wrapper
        .deposit_and_borrow(&weth, COLLATERAL, &usdc, BORROW, &user)
        .unwrap();
    let deposit_before = fixture.wrapper.get_user_deposit_amount(&weth, &user);
    let borrow_before = fixture.wrapper.get_borrow_amount(&usdc, &user);

    fixture.approve(&weth, COLLATERAL / 2);
    fixture
        .wrapper
        .deposit_and_borrow(&weth, COLLATERAL / 2, &usdc, BORROW / 4, &user)
        .unwrap();

    assert_eq!(
        fixture.wrapper.get_user_deposit_amount(&weth, &user),
        deposit_before + COLLATERAL / 2
    );
    assert_eq!(
        fixture.wrapper.get_borrow_amount(&usdc, &user),
        borrow_before + BORROW / 4
    );
}

#[test]
fn partial_inverse_restores_prior_balances() {
    let fixture = WrapperFixture::new();
    let (weth, usdc, user) = (fixture.weth, fixture.usdc, fixture.user);

    fixture.approve(&weth, COLLATERAL);
    fixture
        .wrapper
        .deposit_and_borrow(&weth, COLLATERAL, &usdc, BORROW, &user)
        .unwrap();

    fixture.approve(&usdc, BORROW / 2);
    fixture
        .wrapper
        .payback_and_withdraw(&weth, COLLATERAL / 4, &usdc, BORROW / 2, &user)
        .unwrap();

    assert_eq!(
        fixture.wrapper.get_user_deposit_amount(&weth, &user),
        COLLATERAL - COLLATERAL / 4
    );
    assert_eq!(
        fixture.wrapper.get_borrow_amount(&usdc, &user),
        BORROW - BORROW / 2
    );
}

#[test]
fn composite_events_carry_updated_positions() {
    let fixture = WrapperFixture::new();
    let (weth, usdc, user) = (fixture.weth, fixture.usdc, fixture.user);

    fixture.approve(&weth, COLLATERAL);
    let event = fixture
        .wrapper
        .deposit_and_borrow(&weth, COLLATERAL, &usdc, BORROW, &user)
        .unwrap();
    let WrapperEvent::DepositAndBorrow(event) = event else {
        panic!("expected a DepositAndBorrow event");
    };
    assert_eq!(event.user, user);
    assert_eq!(event.asset_in, weth);
    assert_eq!(event.amount_in, COLLATERAL);
    assert_eq!(event.asset_out, usdc);
    assert_eq!(event.amount_out, BORROW);
    assert_eq!(event.collateral_position.deposit_atoms(), COLLATERAL);
    assert_eq!(event.debt_position.borrow_atoms(), BORROW);

    fixture.approve(&usdc, BORROW);
    let event = fixture
        .wrapper
        .payback_and_withdraw(&weth, COLLATERAL, &usdc, BORROW, &user)
        .unwrap();
    let WrapperEvent::PaybackAndWithdraw(event) = event else {
        panic!("expected a PaybackAndWithdraw event");
    };
    assert_eq!(event.collateral_position.deposit_atoms(), 0);
    assert_eq!(event.debt_position.borrow_atoms(), 0);
}
