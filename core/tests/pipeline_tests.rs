use std::{
    sync::{Arc, Once},
    time::Duration,
};

use async_trait::async_trait;
use stakescan_core::{
    context::{AccountContext, TransactionState},
    error::{Result, StakescanCoreError},
    filter::{FilterOptions, RiskBand},
    network::Network,
    price::{PriceSource, StaticPriceSource},
    reward::{RewardEstimator, TimePeriodUnit},
    validator::{SortKey, Validator, ValidatorMap},
    view::{Action, ValidatorsView},
    SortOrder,
};

static ENV: Once = Once::new();
fn env_logger() {
    ENV.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn validator_set() -> Vec<Validator> {
    serde_json::from_value(serde_json::json!([
        {
            "stashId": "A",
            "name": "alpha",
            "estimatedPoolReward": 40.0,
            "riskScore": 0.2,
            "commission": 5,
            "numOfNominators": 10,
            "ownStake": 100,
            "totalStake": 1000
        },
        {
            "stashId": "B",
            "estimatedPoolReward": 25.0,
            "riskScore": 0.5,
            "commission": 15,
            "numOfNominators": 200,
            "ownStake": 50,
            "totalStake": 5000
        },
        {
            "stashId": "C",
            "estimatedPoolReward": 60.0,
            "riskScore": 0.8,
            "commission": 2,
            "numOfNominators": 64,
            "ownStake": 900,
            "totalStake": 3000
        }
    ]))
    .unwrap()
}

fn new_view() -> ValidatorsView {
    let ctx = AccountContext::new(Network::Kusama)
        .with_stash_account("HNZata7iMYWmk5RvZRTiAsSDhV8366zq2YGb3tLH5Upf74F")
        .with_bonded_amount(25.0);
    let transaction = TransactionState {
        staking_amount: Some(100.0),
        time_period_value: Some(6),
        time_period_unit: Some(TimePeriodUnit::Months),
        selected_validators: vec![],
        validator_map: ValidatorMap {
            total: validator_set(),
            ..Default::default()
        },
    };
    ValidatorsView::new(&ctx, &transaction)
}

/// Resolves after a delay, so a request issued earlier can finish later
struct SlowPriceSource {
    delay: Duration,
}

#[async_trait]
impl PriceSource for SlowPriceSource {
    async fn get_price(&self) -> Result<f64> {
        tokio::time::sleep(self.delay).await;
        Ok(3.0)
    }

    fn name(&self) -> String {
        "slow".to_string()
    }
}

struct FailingPriceSource;

#[async_trait]
impl PriceSource for FailingPriceSource {
    async fn get_price(&self) -> Result<f64> {
        Err(StakescanCoreError::PriceUnavailable("feed offline".to_string()))
    }

    fn name(&self) -> String {
        "failing".to_string()
    }
}

#[tokio::test]
async fn test_filter_select_and_estimate() {
    env_logger();
    let mut view = new_view();
    let estimator = RewardEstimator::new(Network::Kusama)
        .with_price_source(Arc::new(StaticPriceSource::new(2.0)));

    // Nothing selected yet: the initial estimate is zero.
    let request = view.initial_request().unwrap();
    assert!(view.apply_reward(request.run(&estimator).await));
    assert_eq!(view.result().unwrap().returns.native, 0.0);

    view.dispatch(Action::SetSortKey(SortKey::Commission)).unwrap();
    view.dispatch(Action::SetSortOrder(SortOrder::Desc)).unwrap();
    view.dispatch(Action::ToggleFilterPanel).unwrap();
    view.dispatch(Action::SetFilterOptions(
        FilterOptions::default()
            .with_risk_score(RiskBand::Low)
            .with_commission(3.0),
    ))
    .unwrap();

    let shown: Vec<Validator> = view.filtered_validators().to_vec();
    let ids: Vec<&str> = shown.iter().map(|v| v.stash_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);

    let mut last = None;
    for validator in shown {
        last = view.dispatch(Action::Select(validator)).unwrap();
    }
    let outcome = last.unwrap().run(&estimator).await;
    assert!(view.apply_reward(outcome));

    let result = view.result().unwrap();
    assert_eq!(result.validators.len(), 2);
    assert_eq!(result.validators[0].stash_id, "A");
    assert_eq!(result.validators[0].allocated_stake, 50.0);
    assert_eq!(result.eras, 720);
    assert_eq!(result.additional_bond, 75.0);
    assert!(result.returns.native > 0.0);
    let fiat = result.returns.fiat.unwrap();
    assert!((fiat - result.returns.native * 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_out_of_order_resolution_keeps_latest() {
    env_logger();
    let mut view = new_view();
    let slow = RewardEstimator::new(Network::Kusama).with_price_source(Arc::new(
        SlowPriceSource {
            delay: Duration::from_millis(50),
        },
    ));
    let fast = RewardEstimator::new(Network::Kusama)
        .with_price_source(Arc::new(StaticPriceSource::new(3.0)));

    let a = view.validators().iter().find(|v| v.stash_id == "A").cloned().unwrap();
    let first = view.dispatch(Action::Select(a)).unwrap().unwrap();
    let second = view
        .dispatch(Action::SetTimePeriodUnit(TimePeriodUnit::Years))
        .unwrap()
        .unwrap();

    let (first_outcome, second_outcome) = tokio::join!(first.run(&slow), second.run(&fast));

    // The newer request finished first; the older one must not overwrite it.
    assert!(view.apply_reward(second_outcome));
    assert!(!view.apply_reward(first_outcome));
    assert_eq!(view.result().unwrap().period_days, 365);
}

#[tokio::test]
async fn test_price_failure_is_non_fatal() {
    env_logger();
    let mut view = new_view();
    let estimator = RewardEstimator::new(Network::Kusama);
    let failing = RewardEstimator::new(Network::Kusama).with_price_source(Arc::new(FailingPriceSource));

    let b = view.validators().iter().find(|v| v.stash_id == "B").cloned().unwrap();
    let request = view.dispatch(Action::Select(b)).unwrap().unwrap();
    assert!(view.apply_reward(request.run(&estimator).await));
    let before = view.result().cloned();

    let request = view.dispatch(Action::SetAmount(Some(250.0))).unwrap().unwrap();
    assert!(view.apply_reward(request.run(&failing).await));

    assert_eq!(view.result().cloned(), before);
    assert_eq!(
        view.notice(),
        Some("Price lookup failed: feed offline")
    );
}
