use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use stakescan_core::{
    filter::{FilterOptions, Range, RiskBand},
    network::Network,
    reward::TimePeriodUnit,
    validator::SortKey,
    SortOrder,
};

#[derive(Parser, Debug)]
#[command(name = "stakescan")]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Network to use (kusama, polkadot, ksm, dot)
    #[arg(long, short, env = "STAKESCAN_NETWORK", default_value_t = Network::Kusama, global = true)]
    pub network: Network,

    /// Stakescan API base url [default: the network's public API]
    #[arg(long, env = "STAKESCAN_API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    /// Price API base url
    #[arg(long, env = "STAKESCAN_PRICE_API_URL", global = true)]
    pub price_api_url: Option<String>,

    /// Skip the USD price lookup
    #[arg(long, env = "STAKESCAN_NO_PRICE", global = true)]
    pub no_price: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Staking overview of a nominator
    Overview(OverviewArgs),

    /// Browse, filter and select validators, with a live reward projection
    Validators(ValidatorsArgs),

    /// Project rewards for a set of validators
    Calculate(CalculateArgs),
}

#[derive(ClapArgs, Debug)]
pub struct OverviewArgs {
    /// Stash address of the connected account
    #[arg(long, env = "STAKESCAN_ADDRESS")]
    pub address: Option<String>,
}

/// Where the validator list comes from
#[derive(ClapArgs, Debug)]
pub struct SourceArgs {
    /// Read validators from a JSON file (a list, or the risk-set object)
    /// instead of the API
    #[arg(long, value_name = "PATH")]
    pub validators_file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct StakeArgs {
    /// Amount to stake, in tokens
    #[arg(long)]
    pub amount: Option<f64>,

    /// Length of the staking period
    #[arg(long)]
    pub period: Option<u32>,

    /// Unit of the staking period (days, months, years)
    #[arg(long, default_value_t = TimePeriodUnit::Months)]
    pub unit: TimePeriodUnit,

    /// Funds already bonded, in tokens
    #[arg(long, default_value_t = 0.0)]
    pub bonded: f64,

    /// Stash ids of the validators to nominate
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ValidatorsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub stake: StakeArgs,

    /// Column to sort by
    #[arg(long, default_value_t = SortKey::EstimatedPoolReward)]
    pub sort_by: SortKey,

    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub order: SortOrder,

    /// Keep validators in this risk band (low, medium, high)
    #[arg(long)]
    pub risk: Option<RiskBand>,

    /// Keep validators charging at most this commission, in percent
    #[arg(long)]
    pub max_commission: Option<f64>,

    #[arg(long)]
    pub min_nominators: Option<u32>,

    #[arg(long)]
    pub max_nominators: Option<u32>,

    #[arg(long)]
    pub min_own_stake: Option<f64>,

    #[arg(long)]
    pub max_own_stake: Option<f64>,

    #[arg(long)]
    pub min_total_stake: Option<f64>,

    #[arg(long)]
    pub max_total_stake: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ValidatorsArgs {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            num_of_nominators: Range::new(self.min_nominators, self.max_nominators),
            risk_score: self.risk,
            own_stake: Range::new(self.min_own_stake, self.max_own_stake),
            total_stake: Range::new(self.min_total_stake, self.max_total_stake),
            commission: self.max_commission,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub stake: StakeArgs,

    /// Do not restake rewards every era
    #[arg(long)]
    pub simple: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validators_command() {
        let args = Args::try_parse_from([
            "stakescan",
            "--network",
            "dot",
            "validators",
            "--sort-by",
            "commission",
            "--order",
            "desc",
            "--risk",
            "low",
            "--min-nominators",
            "0",
            "--select",
            "A,B",
            "--amount",
            "100",
            "--period",
            "6",
        ])
        .unwrap();

        assert_eq!(args.network, Network::Polkadot);
        let Commands::Validators(validators) = args.command else {
            panic!("expected validators command");
        };
        assert_eq!(validators.sort_by, SortKey::Commission);
        assert_eq!(validators.order, SortOrder::Desc);
        assert_eq!(validators.stake.select, vec!["A", "B"]);
        assert_eq!(validators.stake.unit, TimePeriodUnit::Months);

        let options = validators.filter_options();
        assert_eq!(options.risk_score, Some(RiskBand::Low));
        assert_eq!(options.num_of_nominators.min, Some(0));
        assert!(options.is_active());
    }

    #[test]
    fn test_rejects_unknown_unit() {
        let result = Args::try_parse_from([
            "stakescan",
            "calculate",
            "--amount",
            "1",
            "--period",
            "1",
            "--unit",
            "fortnights",
        ]);
        assert!(result.is_err());
    }
}
