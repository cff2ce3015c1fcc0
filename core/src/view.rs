//! State of the validators view.
//!
//! Every change goes through [`ValidatorsView::dispatch`]. Each [`Action`]
//! declares the derived values it invalidates, and the dispatcher recomputes
//! exactly those: the sorted list, the filtered view, or the reward estimate.
//! Reward estimates are asynchronous, so the dispatcher only hands out a
//! [`RewardRequest`] tagged with a generation number; outcomes are applied
//! through [`ValidatorsView::apply_reward`], which drops anything but the
//! latest generation.

use log::{debug, warn};

use crate::{
    context::{AccountContext, TransactionState},
    error::{Result, StakescanCoreError},
    filter::{filter_validators, FilterOptions},
    reward::{RewardEstimator, RewardQuery, RewardResult, TimePeriodUnit},
    selection::SelectionMap,
    validator::{sort_validators, SortKey, Validator},
    SortOrder,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetSortKey(SortKey),
    SetSortOrder(SortOrder),
    ToggleFilterPanel,
    SetFilterOptions(FilterOptions),
    SetAmount(Option<f64>),
    SetTimePeriodValue(Option<u32>),
    SetTimePeriodUnit(TimePeriodUnit),
    Select(Validator),
    Deselect(String),
    Toggle(Validator),
    ReplaceValidators(Vec<Validator>),
}

/// Derived value an action invalidates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dependency {
    Sort,
    Filter,
    Reward,
}

impl Action {
    pub fn dependencies(&self) -> &'static [Dependency] {
        use Dependency::*;

        match self {
            Self::SetSortKey(_) | Self::SetSortOrder(_) => &[Sort, Filter],
            Self::ToggleFilterPanel | Self::SetFilterOptions(_) => &[Filter],
            Self::SetAmount(_)
            | Self::SetTimePeriodValue(_)
            | Self::SetTimePeriodUnit(_)
            | Self::Select(_)
            | Self::Deselect(_)
            | Self::Toggle(_) => &[Reward],
            Self::ReplaceValidators(_) => &[Sort, Filter, Reward],
        }
    }
}

/// A reward estimate the caller must run and hand back
#[derive(Clone, Debug, PartialEq)]
pub struct RewardRequest {
    pub generation: u64,
    pub query: RewardQuery,
}

impl RewardRequest {
    pub async fn run(self, estimator: &RewardEstimator) -> RewardOutcome {
        RewardOutcome {
            generation: self.generation,
            result: estimator.estimate(&self.query).await,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RewardOutcome {
    pub generation: u64,
    pub result: Result<RewardResult>,
}

#[derive(Clone, Debug)]
pub struct ValidatorsView {
    bonded_amount: f64,

    /// Base list, kept sorted by `sort_key`/`sort_order`
    validators: Vec<Validator>,
    filtered_validators: Vec<Validator>,
    selection: SelectionMap,

    filter_panel_open: bool,
    filter_options: FilterOptions,
    sort_key: SortKey,
    sort_order: SortOrder,

    staking_amount: Option<f64>,
    time_period_value: Option<u32>,
    time_period_unit: TimePeriodUnit,
    compound: bool,

    result: Option<RewardResult>,
    notice: Option<String>,
    latest_generation: u64,
    pending: Option<u64>,
}

impl ValidatorsView {
    pub fn new(ctx: &AccountContext, transaction: &TransactionState) -> Self {
        let validators = transaction.validator_map.total.clone();
        let mut selection: SelectionMap =
            transaction.selected_validators.iter().cloned().collect();
        let dropped = selection.retain_known(&validators);
        if dropped > 0 {
            warn!("Dropped {dropped} selected validators missing from the validator set");
        }

        let mut view = Self {
            bonded_amount: ctx.bonded_amount,
            filtered_validators: Vec::new(),
            validators,
            selection,
            filter_panel_open: false,
            filter_options: FilterOptions::default(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            staking_amount: transaction.staking_amount,
            time_period_value: transaction.time_period_value,
            time_period_unit: transaction.time_period_unit.unwrap_or_default(),
            compound: true,
            result: None,
            notice: None,
            latest_generation: 0,
            pending: None,
        };
        view.recompute_sort();
        view.recompute_filter();
        view
    }

    /// Reward request for the initial inputs, if they are complete
    pub fn initial_request(&mut self) -> Option<RewardRequest> {
        self.recompute_reward()
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Option<RewardRequest>> {
        let dependencies = action.dependencies();
        self.reduce(action)?;

        let mut request = None;
        for dependency in dependencies {
            match dependency {
                Dependency::Sort => self.recompute_sort(),
                Dependency::Filter => self.recompute_filter(),
                Dependency::Reward => request = self.recompute_reward(),
            }
        }
        Ok(request)
    }

    fn reduce(&mut self, action: Action) -> Result<()> {
        match action {
            Action::SetSortKey(key) => self.sort_key = key,
            Action::SetSortOrder(order) => self.sort_order = order,
            Action::ToggleFilterPanel => self.filter_panel_open = !self.filter_panel_open,
            Action::SetFilterOptions(options) => {
                options.validate()?;
                self.filter_options = options;
            }
            Action::SetAmount(amount) => self.staking_amount = amount,
            Action::SetTimePeriodValue(value) => self.time_period_value = value,
            Action::SetTimePeriodUnit(unit) => self.time_period_unit = unit,
            Action::Select(validator) => {
                let current = self.known(&validator.stash_id)?;
                self.selection.add(current.stash_id.clone(), current);
            }
            Action::Deselect(stash_id) => {
                self.selection.remove(&stash_id);
            }
            Action::Toggle(validator) => {
                if self.selection.remove(&validator.stash_id).is_none() {
                    let current = self.known(&validator.stash_id)?;
                    self.selection.add(current.stash_id.clone(), current);
                }
            }
            Action::ReplaceValidators(validators) => {
                self.validators = validators;
                self.selection.retain_known(&self.validators);
            }
        }
        Ok(())
    }

    /// The current set's record for `stash_id`
    fn known(&self, stash_id: &str) -> Result<Validator> {
        self.validators
            .iter()
            .find(|v| v.stash_id == stash_id)
            .cloned()
            .ok_or_else(|| StakescanCoreError::UnknownValidator(stash_id.to_string()))
    }

    fn recompute_sort(&mut self) {
        sort_validators(&mut self.validators, self.sort_key, self.sort_order);
    }

    fn recompute_filter(&mut self) {
        self.filtered_validators = if self.filter_panel_open {
            filter_validators(&self.validators, &self.filter_options)
        } else {
            self.validators.clone()
        };
    }

    fn recompute_reward(&mut self) -> Option<RewardRequest> {
        let (Some(staking_amount), Some(time_period_value)) =
            (self.staking_amount, self.time_period_value)
        else {
            return None;
        };
        if staking_amount == 0.0 || time_period_value == 0 {
            return None;
        }

        self.latest_generation += 1;
        self.pending = Some(self.latest_generation);
        debug!("Issuing reward request #{}", self.latest_generation);

        Some(RewardRequest {
            generation: self.latest_generation,
            query: RewardQuery {
                selected_validators: self.selection.ordered_in(&self.validators),
                staking_amount,
                time_period_value,
                time_period_unit: self.time_period_unit,
                compound: self.compound,
                bonded_amount: self.bonded_amount,
            },
        })
    }

    /// Apply a finished estimate. Returns false when a newer request has
    /// been issued since and the outcome was discarded.
    pub fn apply_reward(&mut self, outcome: RewardOutcome) -> bool {
        if outcome.generation != self.latest_generation {
            debug!(
                "Discarding stale reward result #{} (latest #{})",
                outcome.generation, self.latest_generation
            );
            return false;
        }

        self.pending = None;
        match outcome.result {
            Ok(result) => {
                self.result = Some(result);
                self.notice = None;
            }
            Err(e) => {
                warn!("Reward estimate failed: {e}");
                self.notice = Some(e.to_string());
            }
        }
        true
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn filtered_validators(&self) -> &[Validator] {
        &self.filtered_validators
    }

    pub fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    /// Selected validators in list order
    pub fn selected_validators(&self) -> Vec<Validator> {
        self.selection.ordered_in(&self.validators)
    }

    pub fn filter_panel_open(&self) -> bool {
        self.filter_panel_open
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn sort(&self) -> (SortKey, SortOrder) {
        (self.sort_key, self.sort_order)
    }

    /// Latest successful estimate
    pub fn result(&self) -> Option<&RewardResult> {
        self.result.as_ref()
    }

    /// Message of the last failed estimate, cleared by the next success
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
