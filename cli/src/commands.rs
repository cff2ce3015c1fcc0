use std::{fs, path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use stakescan_api_client::client::StakescanApiClient;
use stakescan_core::{
    context::{AccountContext, TransactionState},
    overview::{FetchFailure, OverviewCards, OverviewState, Recovery},
    price::PriceSource,
    reward::{RewardEstimator, RewardResult},
    validator::{Validator, ValidatorMap},
    view::{Action, ValidatorsView},
};

use crate::args::{Args, CalculateArgs, OverviewArgs, SourceArgs, StakeArgs, ValidatorsArgs};

pub async fn overview(args: &Args, client: &StakescanApiClient, cmd: &OverviewArgs) -> Result<()> {
    let mut ctx = AccountContext::new(args.network);
    if let Some(address) = &cmd.address {
        ctx = ctx.with_stash_account(address.clone());
    }

    let state = OverviewState::resolve(&ctx, |address| async move {
        client.get_user_data(&address).await
    })
    .await;

    match state {
        OverviewState::NoAccount => {
            println!("No account connected. Pass --address or set STAKESCAN_ADDRESS.");
        }
        OverviewState::Loading => {}
        OverviewState::Unavailable { reason, recovery } => {
            match reason {
                FetchFailure::NoData => println!("This account has no active nominations."),
                FetchFailure::Failed(e) => println!("Could not load the overview: {e}"),
            }
            match recovery {
                Recovery::RewardCalculator => println!(
                    "Estimate what you could earn with `stakescan calculate --amount <AMOUNT> --period <PERIOD>`."
                ),
            }
        }
        OverviewState::Ready(data) => {
            let price = fetch_price(args, client).await;
            println!("{}", OverviewCards::new(&data.stats, &ctx, price));
            if !data.validators_info.is_empty() {
                println!();
                print_validators(&data.validators_info, |_| false);
            }
        }
    }
    Ok(())
}

pub async fn validators(
    args: &Args,
    client: &StakescanApiClient,
    cmd: &ValidatorsArgs,
) -> Result<()> {
    let validator_map = load_validator_map(client, &cmd.source).await?;
    let stake = &cmd.stake;

    let ctx = AccountContext::new(args.network).with_bonded_amount(stake.bonded);
    let transaction = TransactionState {
        staking_amount: stake.amount,
        time_period_value: stake.period,
        time_period_unit: Some(stake.unit),
        selected_validators: vec![],
        validator_map,
    };
    let mut view = ValidatorsView::new(&ctx, &transaction);

    let mut request = view.initial_request();
    let mut actions = vec![
        Action::SetSortKey(cmd.sort_by),
        Action::SetSortOrder(cmd.order),
    ];
    let options = cmd.filter_options();
    if options.is_active() {
        actions.push(Action::SetFilterOptions(options));
        actions.push(Action::ToggleFilterPanel);
    }
    for validator in find_validators(view.validators(), &stake.select)? {
        actions.push(Action::Select(validator));
    }
    for action in actions {
        if let Some(next) = view.dispatch(action)? {
            request = Some(next);
        }
    }

    if let Some(request) = request {
        let estimator = estimator(args, client)?;
        view.apply_reward(request.run(&estimator).await);
    }

    if cmd.json {
        let body = serde_json::json!({
            "validators": view.filtered_validators(),
            "selected": view.selected_validators(),
            "result": view.result(),
            "notice": view.notice(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let (sort_key, sort_order) = view.sort();
    info!(
        "Showing {} of {} validators sorted by {} {sort_order:?}",
        view.filtered_validators().len(),
        view.validators().len(),
        sort_key.label()
    );
    print_validators(view.filtered_validators(), |stash_id| {
        view.selection().contains(stash_id)
    });

    if let Some(notice) = view.notice() {
        println!("\nCould not update the estimate: {notice}");
    }
    if let Some(result) = view.result() {
        println!();
        print_result(result, args.network.params().token_symbol);
    }
    Ok(())
}

pub async fn calculate(
    args: &Args,
    client: &StakescanApiClient,
    cmd: &CalculateArgs,
) -> Result<()> {
    let StakeArgs {
        amount,
        period,
        unit,
        bonded,
        select,
    } = &cmd.stake;
    let (Some(amount), Some(period)) = (amount, period) else {
        bail!("--amount and --period are required");
    };

    let validator_map = load_validator_map(client, &cmd.source).await?;
    let selected = find_validators(&validator_map.total, select)?;

    let result = estimator(args, client)?
        .calculate_reward(&selected, *amount, *period, *unit, !cmd.simple, *bonded)
        .await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, args.network.params().token_symbol);
    }
    Ok(())
}

async fn load_validator_map(client: &StakescanApiClient, source: &SourceArgs) -> Result<ValidatorMap> {
    match &source.validators_file {
        Some(path) => read_validator_file(path),
        None => Ok(client.get_validator_map().await?),
    }
}

/// Accepts either the risk-set object or a bare list of validators
fn read_validator_file(path: &Path) -> Result<ValidatorMap> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    if value.is_array() {
        Ok(ValidatorMap {
            total: serde_json::from_value(value)?,
            ..Default::default()
        })
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn find_validators(validators: &[Validator], stash_ids: &[String]) -> Result<Vec<Validator>> {
    stash_ids
        .iter()
        .map(|stash_id| {
            validators
                .iter()
                .find(|v| &v.stash_id == stash_id)
                .cloned()
                .with_context(|| format!("Unknown validator {stash_id}"))
        })
        .collect()
}

fn estimator(args: &Args, client: &StakescanApiClient) -> Result<RewardEstimator> {
    let estimator = RewardEstimator::new(args.network);
    if args.no_price {
        return Ok(estimator);
    }
    Ok(estimator.with_price_source(Arc::new(client.price_source()?)))
}

/// Price for the overview cards; the cards render without fiat on failure
async fn fetch_price(args: &Args, client: &StakescanApiClient) -> Option<f64> {
    if args.no_price {
        return None;
    }
    let source = match client.price_source() {
        Ok(source) => source,
        Err(e) => {
            warn!("Price source unavailable: {e}");
            return None;
        }
    };
    match source.get_price().await {
        Ok(price) => Some(price),
        Err(e) => {
            warn!("{} failed: {e}", source.name());
            None
        }
    }
}

fn print_validators(validators: &[Validator], is_selected: impl Fn(&str) -> bool) {
    println!(
        "{:<3} {:<50} {:>10} {:>6} {:>10} {:>11} {:>14} {:>14}",
        "", "Validator", "Est. Pool", "Risk", "Commission", "Nominators", "Own Stake", "Total Stake"
    );
    for v in validators {
        let marker = if is_selected(&v.stash_id) { "[x]" } else { "[ ]" };
        let name = v.name.as_deref().unwrap_or(&v.stash_id);
        println!(
            "{marker:<3} {name:<50} {:>10.3} {:>6.2} {:>9.2}% {:>11} {:>14.3} {:>14.3}",
            v.estimated_pool_reward,
            v.risk_score,
            v.commission,
            v.num_of_nominators,
            v.own_stake,
            v.total_stake
        );
    }
}

fn print_result(result: &RewardResult, token_symbol: &str) {
    println!(
        "Projected returns over {} days ({} eras): {:.3} {token_symbol}",
        result.period_days, result.eras, result.returns.native
    );
    if let Some(fiat) = result.returns.fiat {
        println!("                                  ${fiat:.2}");
    }
    println!("Yield: {:.2}%", result.yield_percentage);
    if result.additional_bond > 0.0 {
        println!(
            "Bond {:.3} {token_symbol} more to stake {:.3} {token_symbol}",
            result.additional_bond, result.staking_amount
        );
    }
    for validator in &result.validators {
        println!(
            "  {:<50} {:>12.3} {token_symbol} staked, {:.6} {token_symbol}/era",
            validator.stash_id, validator.allocated_stake, validator.era_reward
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(stash_id: &str) -> Validator {
        Validator {
            stash_id: stash_id.to_string(),
            estimated_pool_reward: 10.0,
            risk_score: 0.5,
            commission: 5.0,
            num_of_nominators: 12,
            own_stake: 100.0,
            total_stake: 1000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_find_validators_keeps_requested_order() {
        let validators = vec![validator("A"), validator("B"), validator("C")];
        let found = find_validators(&validators, &["C".to_string(), "A".to_string()]).unwrap();
        let ids: Vec<&str> = found.iter().map(|v| v.stash_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A"]);

        assert!(find_validators(&validators, &["Z".to_string()]).is_err());
    }

    #[test]
    fn test_read_validator_file_accepts_list_and_map() {
        let dir = std::env::temp_dir();
        let list_path = dir.join(format!("stakescan-list-{}.json", std::process::id()));
        let map_path = dir.join(format!("stakescan-map-{}.json", std::process::id()));

        let list = vec![validator("A"), validator("B")];
        fs::write(&list_path, serde_json::to_string(&list).unwrap()).unwrap();
        let map = ValidatorMap {
            low_risk: vec![validator("A")],
            total: list.clone(),
            ..Default::default()
        };
        fs::write(&map_path, serde_json::to_string(&map).unwrap()).unwrap();

        assert_eq!(read_validator_file(&list_path).unwrap().total, list);
        assert_eq!(read_validator_file(&map_path).unwrap(), map);

        let _ = fs::remove_file(list_path);
        let _ = fs::remove_file(map_path);
    }
}
