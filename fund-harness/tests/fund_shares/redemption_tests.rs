//! Redemption rounds: escrow a redemption request, execute it, and verify
//! that shares are annihilated, the incentive reaches the worker, and the
//! redeemed value flows back to the investor.

use alloy::primitives::U256;
use fund_harness::models::RedemptionRound;

use crate::helpers::{u, TestEnv};
use crate::init_logger;

const ROUNDS: [RedemptionRound; 3] = [
    RedemptionRound { wanted_shares: 10_000, wanted_value: 10_000, incentive: 100 },
    RedemptionRound { wanted_shares: 500, wanted_value: 3_000, incentive: 500 },
    RedemptionRound { wanted_shares: 20_143_783, wanted_value: 2_000, incentive: 5_000 },
];

#[tokio::test]
#[ignore = "requires a dev chain with the fund protocol deployed and shares issued"]
async fn redemption_rounds_annihilate_shares() {
    init_logger();
    let env = TestEnv::bootstrap().await.unwrap();
    let fund = env.bind_fund().await.unwrap();
    let investor_opts = env.opts(env.investor);

    for (index, round) in ROUNDS.iter().enumerate() {
        let round_no = index + 1;
        let shares = u(round.wanted_shares);
        let value = u(round.wanted_value);
        let incentive = u(round.incentive);

        let pre = env.snapshot(&fund).await.unwrap();
        let baseline_block = env.client.block_number().await.unwrap();

        // The investor covers the incentive, then escrows the redemption;
        // nothing moves at request time.
        env.mln_token
            .approve(fund.address(), incentive, &investor_opts)
            .await
            .unwrap();
        fund.request_redemption(shares, value, incentive, &investor_opts)
            .await
            .unwrap();
        let post = env.snapshot(&fund).await.unwrap();
        assert_eq!(post, pre, "request must not move tokens (round {round_no})");

        // Exactly one RequestUpdated log since the round began.
        let updates = fund.request_updates(baseline_block).await.unwrap();
        assert_eq!(updates.len(), 1, "round {round_no}");

        // Leftover allowance is reduced to zero before execution.
        env.mln_token
            .approve(fund.address(), U256::ZERO, &investor_opts)
            .await
            .unwrap();
        let remaining = env
            .mln_token
            .allowance(env.investor, fund.address())
            .await
            .unwrap();
        assert_eq!(remaining, U256::ZERO, "round {round_no}");

        // Execution needs two fresh price points.
        env.refresh_datafeed().await.unwrap();

        let pre_exec = env.snapshot(&fund).await.unwrap();
        let investor_pre_shares = fund.balance_of(env.investor).await.unwrap();
        let pre_total_shares = fund.total_supply().await.unwrap();
        let worker_pre_mln = env.mln_token.balance_of(env.worker).await.unwrap();

        let request_id = fund.last_request_id().await.unwrap();
        fund.execute_request(request_id, &env.opts(env.worker).with_gas(3_000_000))
            .await
            .unwrap();

        let investor_post_shares = fund.balance_of(env.investor).await.unwrap();
        let post_total_shares = fund.total_supply().await.unwrap();
        let worker_post_mln = env.mln_token.balance_of(env.worker).await.unwrap();
        let post_exec = env.snapshot(&fund).await.unwrap();

        // Shares are burned from the investor and from the total supply,
        // the incentive reaches the worker, and the redeemed value flows
        // from the fund back to the investor.
        assert_eq!(investor_post_shares, investor_pre_shares - shares, "round {round_no}");
        assert_eq!(post_total_shares, pre_total_shares - shares, "round {round_no}");
        assert_eq!(worker_post_mln, worker_pre_mln + incentive, "round {round_no}");
        assert_eq!(
            post_exec.investor.mln,
            pre_exec.investor.mln + value,
            "round {round_no}"
        );
        assert_eq!(post_exec.investor.eth, pre_exec.investor.eth, "round {round_no}");
        assert_eq!(post_exec.manager, pre_exec.manager, "round {round_no}");
        assert_eq!(post_exec.fund.mln, pre_exec.fund.mln, "round {round_no}");
        assert_eq!(post_exec.fund.eth, pre_exec.fund.eth, "round {round_no}");
    }
}
