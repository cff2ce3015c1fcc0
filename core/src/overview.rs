//! Account overview: the nominator's stats and the validators they back.

use std::future::Future;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{context::AccountContext, validator::Validator};

/// Body the API returns for accounts without active nominations
pub const NO_DATA_SENTINEL: &str = "No data found!";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_amount_staked: f64,
    pub estimated_rewards: f64,
    pub earnings: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub stats: Stats,

    #[serde(default)]
    pub validators_info: Vec<Validator>,
}

/// Why the overview could not be loaded
#[derive(Clone, Debug, PartialEq)]
pub enum FetchFailure {
    /// The account has no active nominations
    NoData,
    Failed(String),
}

/// Where the user is sent when the overview is unavailable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    RewardCalculator,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverviewState {
    NoAccount,
    Loading,
    Unavailable {
        reason: FetchFailure,
        recovery: Recovery,
    },
    Ready(UserData),
}

impl OverviewState {
    /// State before any fetch completes
    pub fn begin(ctx: &AccountContext) -> Self {
        if ctx.is_connected() {
            Self::Loading
        } else {
            Self::NoAccount
        }
    }

    pub fn from_fetch(result: Result<UserData, FetchFailure>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(reason) => Self::Unavailable {
                reason,
                recovery: Recovery::RewardCalculator,
            },
        }
    }

    /// Load the overview of the connected stash. Nothing is fetched when no
    /// account is connected.
    pub async fn resolve<F, Fut, E>(ctx: &AccountContext, fetch: F) -> Self
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<UserData, E>>,
        E: Into<FetchFailure>,
    {
        let address = match ctx.stash_account.as_deref() {
            Some(address) if ctx.is_connected() => address.to_string(),
            _ => return Self::NoAccount,
        };

        info!("Fetching overview for {address}");
        let state = Self::from_fetch(fetch(address).await.map_err(Into::into));
        if let Self::Unavailable { reason, .. } = &state {
            warn!("Overview unavailable: {reason:?}");
        }
        state
    }
}

/// A token amount with its USD value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardFigure {
    pub amount: f64,
    pub fiat: Option<f64>,
}

impl CardFigure {
    fn new(amount: f64, price: Option<f64>) -> Self {
        let amount = round_to(amount, 3);
        Self {
            amount,
            fiat: price.map(|price| round_to(amount * price, 2)),
        }
    }
}

/// Figures shown on the overview cards
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewCards {
    pub token_symbol: &'static str,
    pub staked: CardFigure,
    pub estimated_returns: CardFigure,
    pub earnings: CardFigure,

    /// Funds being unbonded, in tokens
    pub unlocking: f64,
}

impl OverviewCards {
    pub fn new(stats: &Stats, ctx: &AccountContext, price: Option<f64>) -> Self {
        Self {
            token_symbol: ctx.network.params().token_symbol,
            staked: CardFigure::new(stats.total_amount_staked, price),
            estimated_returns: CardFigure::new(stats.estimated_rewards, price),
            earnings: CardFigure::new(stats.earnings, price),
            unlocking: round_to(ctx.total_unlocking(), 2),
        }
    }
}

impl std::fmt::Display for OverviewCards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = [
            ("Staked", &self.staked),
            ("Estimated Returns", &self.estimated_returns),
            ("Earnings", &self.earnings),
        ];
        for (label, figure) in rows {
            write!(f, "{label:<18} {} {}", figure.amount, self.token_symbol)?;
            if let Some(fiat) = figure.fiat {
                write!(f, " (${fiat:.2})")?;
            }
            writeln!(f)?;
        }
        write!(f, "{:<18} {:.2} {}", "Unlocking", self.unlocking, self.token_symbol)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
