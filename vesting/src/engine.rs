//! The vesting book — position lifecycle and top-up tracking.

use crate::bonus;
use crate::error::VestingError;
use crate::position::{BalanceKind, BalanceRecord, PositionState, StakeAccount, VestingPosition};
use std::collections::HashMap;
use vesta_rewards::RpsLedger;
use vesta_types::{Address, EpochNumber, ProtocolParams, Timestamp};
use vesta_utils::{format_duration, weeks_to_secs};

/// Outbound accounting event: credit `amount` to `identity`.
///
/// Actual value movement is the withdrawal layer's responsibility; the core
/// only records that the credit happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayoutEvent {
    pub identity: Address,
    pub amount: u128,
}

/// Result of cutting a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutOutcome {
    /// Paid to the withdrawer.
    pub payout: u128,
    /// Burned — destroyed, never redistributed.
    pub penalty: u128,
}

/// The vesting book — owns every stake account and its state transitions.
///
/// Strictly sequential: each call either applies fully or returns an error
/// with no partial effect. The RPS ledger is a read-only collaborator here;
/// its only writer is the epoch distributor.
pub struct VestingBook {
    params: ProtocolParams,
    accounts: HashMap<Address, StakeAccount>,
    /// Cumulative penalty value destroyed by early exits.
    pub total_burned: u128,
    pending_payouts: Vec<PayoutEvent>,
}

impl VestingBook {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params,
            accounts: HashMap::new(),
            total_burned: 0,
            pending_payouts: Vec::new(),
        }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn account(&self, identity: &Address) -> Option<&StakeAccount> {
        self.accounts.get(identity)
    }

    pub(crate) fn account_mut(
        &mut self,
        identity: &Address,
    ) -> Result<&mut StakeAccount, VestingError> {
        self.accounts
            .get_mut(identity)
            .ok_or_else(|| VestingError::UnknownIdentity(identity.clone()))
    }

    /// Drain the accumulated outbound payout events.
    pub fn drain_payouts(&mut self) -> Vec<PayoutEvent> {
        std::mem::take(&mut self.pending_payouts)
    }

    pub(crate) fn push_payout(&mut self, identity: &Address, amount: u128) {
        if amount > 0 {
            self.pending_payouts.push(PayoutEvent {
                identity: identity.clone(),
                amount,
            });
        }
    }

    /// Derived lifecycle state plus the position tuple.
    ///
    /// A cleared tuple reports `Matured` (the zero tuple's boundaries are
    /// all in the past), which callers distinguish via `is_open()`.
    pub fn position_state(
        &self,
        identity: &Address,
        now: Timestamp,
    ) -> Result<(PositionState, VestingPosition), VestingError> {
        let account = self
            .accounts
            .get(identity)
            .ok_or_else(|| VestingError::UnknownIdentity(identity.clone()))?;
        Ok((account.position.state(now), account.position))
    }

    /// Open a vesting position for `identity` on `validator`.
    ///
    /// Fails while a position is Active or Maturing, and — when reopening
    /// after a cleared position — while the prior position's rewards remain
    /// unclaimed.
    pub fn open_position(
        &mut self,
        identity: &Address,
        validator: &Address,
        principal: u128,
        duration_weeks: u64,
        now: Timestamp,
        epoch: EpochNumber,
        ledger: &RpsLedger,
    ) -> Result<(), VestingError> {
        if principal < self.params.min_vesting_stake {
            return Err(VestingError::BelowMinimum {
                needed: self.params.min_vesting_stake,
                got: principal,
            });
        }
        if duration_weeks == 0 || duration_weeks > self.params.max_duration_weeks {
            return Err(VestingError::InvalidDuration(duration_weeks));
        }
        if let Some(account) = self.accounts.get(identity) {
            if account.position.is_open() {
                return Err(VestingError::PositionAlreadyOpen);
            }
            if self.raw_reward(identity, ledger)? > 0 {
                return Err(VestingError::RewardsNotClaimed);
            }
        }

        // Week count already validated against the duration cap.
        let duration_secs = weeks_to_secs(duration_weeks);
        let baseline_rps = match ledger.rps_at(validator, epoch) {
            Ok(rps) => rps,
            Err(vesta_rewards::RewardsError::NotFound) => 0,
            Err(e) => return Err(e.into()),
        };
        let position = VestingPosition {
            start: now,
            end: now.plus_secs(duration_secs),
            duration_secs,
            original_duration_secs: duration_secs,
            base_rate: self.params.base_rate,
            vest_bonus: bonus::vest_bonus(duration_weeks),
            rsi_bonus: self.params.max_rsi,
        };
        self.accounts.insert(
            identity.clone(),
            StakeAccount {
                validator: validator.clone(),
                position,
                balances: vec![BalanceRecord {
                    epoch,
                    balance_after: principal,
                    kind: BalanceKind::Opened,
                }],
                top_up_count: 0,
                claimed_through: None,
                baseline_rps,
            },
        );
        tracing::info!(
            %identity,
            %validator,
            principal,
            committed = %format_duration(duration_secs),
            "opened vesting position"
        );
        Ok(())
    }

    /// Increase an Active position's principal.
    ///
    /// At most once per epoch, at most `max_top_ups` per lifetime. Extends
    /// the committed duration by the original duration, clamped so the
    /// total never exceeds twice the original.
    pub fn top_up(
        &mut self,
        identity: &Address,
        amount: u128,
        now: Timestamp,
        epoch: EpochNumber,
    ) -> Result<(), VestingError> {
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        let max_top_ups = self.params.max_top_ups;
        let account = self.account_mut(identity)?;
        if !account.position.is_open() || account.position.state(now) != PositionState::Active {
            // A matured position reports the same reason as any other
            // non-active one.
            return Err(VestingError::PositionNotActive);
        }
        if account.top_up_count >= max_top_ups {
            return Err(VestingError::TooManyTopUps);
        }
        let last = account.balances.last().copied().expect("opening record always present");
        if epoch == last.epoch {
            return Err(VestingError::TopUpAlreadyMade);
        }
        if epoch < last.epoch {
            return Err(VestingError::InvalidEpoch);
        }
        let new_balance = last
            .balance_after
            .checked_add(amount)
            .ok_or(VestingError::Overflow)?;

        let original = account.position.original_duration_secs;
        let extended = account
            .position
            .duration_secs
            .saturating_add(original)
            .min(original.saturating_mul(2));
        account.position.duration_secs = extended;
        account.position.end = account.position.start.plus_secs(extended);

        account.balances.push(BalanceRecord {
            epoch,
            balance_after: new_balance,
            kind: BalanceKind::TopUp,
        });
        account.top_up_count += 1;
        tracing::info!(%identity, amount, %epoch, "topped up vesting position");
        Ok(())
    }

    /// Remove `amount` of principal from the position, in any state.
    ///
    /// Cutting while Active incurs the early-exit penalty; the penalty is
    /// burned, the residue is paid out. Removing the full balance clears
    /// the position tuple but keeps the account's history until the earned
    /// rewards are claimed.
    pub fn cut(
        &mut self,
        identity: &Address,
        amount: u128,
        now: Timestamp,
        epoch: EpochNumber,
    ) -> Result<CutOutcome, VestingError> {
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        let account = self.account_mut(identity)?;
        if !account.position.is_open() {
            return Err(VestingError::PositionNotActive);
        }
        let available = account.balance();
        if amount > available {
            return Err(VestingError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let last_epoch = account.balances.last().expect("opening record always present").epoch;
        if epoch < last_epoch {
            return Err(VestingError::InvalidEpoch);
        }

        let penalty = if account.position.state(now) == PositionState::Active {
            bonus::early_exit_penalty(
                amount,
                now,
                account.position.end,
                account.position.duration_secs,
            )?
        } else {
            0
        };
        let payout = amount - penalty;
        let new_balance = available - amount;

        // One balance record per epoch: a cut in an epoch that already has
        // a record folds into it, keeping the sequence strictly increasing.
        if epoch == last_epoch {
            let last = account.balances.last_mut().expect("opening record always present");
            last.balance_after = new_balance;
        } else {
            account.balances.push(BalanceRecord {
                epoch,
                balance_after: new_balance,
                kind: BalanceKind::Cut,
            });
        }
        if new_balance == 0 {
            account.position.clear();
        }
        self.total_burned = self
            .total_burned
            .checked_add(penalty)
            .ok_or(VestingError::Overflow)?;
        self.push_payout(identity, payout);
        tracing::info!(%identity, amount, payout, penalty, "cut vesting position");
        Ok(CutOutcome { payout, penalty })
    }
}

impl VestingBook {
    const TOTAL_BURNED_KEY: &'static [u8] = b"total_burned";

    /// Persist all accounts and counters.
    pub fn save_to_store(
        &self,
        accounts: &dyn vesta_store::AccountStore,
        meta: &dyn vesta_store::MetaStore,
    ) -> Result<(), VestingError> {
        for (identity, account) in &self.accounts {
            let bytes =
                bincode::serialize(account).map_err(|e| VestingError::Store(e.to_string()))?;
            accounts
                .put_account(identity, &bytes)
                .map_err(|e| VestingError::Store(e.to_string()))?;
        }
        meta.put_meta(Self::TOTAL_BURNED_KEY, &self.total_burned.to_be_bytes())
            .map_err(|e| VestingError::Store(e.to_string()))?;
        Ok(())
    }

    /// Restore a vesting book from storage.
    pub fn load_from_store(
        params: ProtocolParams,
        accounts_store: &dyn vesta_store::AccountStore,
        meta: &dyn vesta_store::MetaStore,
    ) -> Result<Self, VestingError> {
        let entries = accounts_store
            .iter_accounts()
            .map_err(|e| VestingError::Store(e.to_string()))?;
        let mut accounts = HashMap::new();
        for (identity, bytes) in entries {
            let account: StakeAccount =
                bincode::deserialize(&bytes).map_err(|e| VestingError::Store(e.to_string()))?;
            accounts.insert(identity, account);
        }
        let total_burned = match meta
            .get_meta(Self::TOTAL_BURNED_KEY)
            .map_err(|e| VestingError::Store(e.to_string()))?
        {
            Some(bytes) if bytes.len() == 16 => {
                u128::from_be_bytes(bytes[..16].try_into().expect("checked length"))
            }
            _ => 0,
        };
        Ok(Self {
            params,
            accounts,
            total_burned,
            pending_payouts: Vec::new(),
        })
    }
}
