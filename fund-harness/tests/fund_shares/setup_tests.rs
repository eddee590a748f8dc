//! Fund setup: whitelist the investor, create the fund, check the empty
//! books, and seed the investor with reference asset.

use alloy::primitives::U256;

use crate::helpers::{u, TestEnv, INITIAL_TOKEN_AMOUNT};
use crate::init_logger;

#[tokio::test]
#[ignore = "requires a dev chain with the fund protocol deployed"]
async fn fund_setup_and_initial_state() {
    init_logger();
    let env = TestEnv::bootstrap().await.unwrap();

    // The investor must be whitelisted before participating.
    env.participation
        .attest_for_identity(env.investor, &env.opts(env.deployer))
        .await
        .unwrap();

    // Price the assets, then let the manager create the fund.
    env.update_datafeed().await.unwrap();
    env.version
        .setup_fund(
            "Melon Portfolio",
            env.addresses.mln_token,
            u(env.settings.management_reward),
            u(env.settings.performance_reward),
            env.addresses.participation,
            env.addresses.rm_make_orders,
            env.addresses.sphere,
            &env.opts(env.manager).with_gas(6_900_000),
        )
        .await
        .unwrap();

    let fund_id = env.version.last_fund_id().await.unwrap();
    assert_eq!(fund_id, U256::ZERO);
    let fund = env.bind_fund().await.unwrap();

    // A fresh fund has empty books and the canonical share price.
    env.update_datafeed().await.unwrap();
    let calc = fund.perform_calculations().await.unwrap();
    assert_eq!(calc.gav, U256::ZERO);
    assert_eq!(calc.management_reward, U256::ZERO);
    assert_eq!(calc.performance_reward, U256::ZERO);
    assert_eq!(calc.unclaimed_rewards, U256::ZERO);
    assert_eq!(calc.nav, U256::ZERO);
    assert_eq!(calc.share_price, U256::from(10u64).pow(U256::from(18u64)));

    // The investor receives initial token from the liquidity provider and
    // nothing else moves.
    let pre = env.snapshot(&fund).await.unwrap();
    env.mln_token
        .transfer(env.investor, u(INITIAL_TOKEN_AMOUNT), &env.opts(env.deployer))
        .await
        .unwrap();
    let post = env.snapshot(&fund).await.unwrap();

    assert_eq!(post.investor.mln, pre.investor.mln + u(INITIAL_TOKEN_AMOUNT));
    assert_eq!(post.investor.eth, pre.investor.eth);
    assert_eq!(post.manager, pre.manager);
    assert_eq!(post.fund, pre.fund);
}
