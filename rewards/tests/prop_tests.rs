use proptest::prelude::*;

use vesta_rewards::{RewardsError, RpsLedger};
use vesta_types::{Address, EpochNumber, Timestamp};

fn validator() -> Address {
    Address::new("vst_validatorprop")
}

/// Build a ledger from (epoch_gap, reward, stake) triples; epochs and
/// timestamps strictly increase by construction.
fn build_ledger(entries: &[(u64, u128, u128)]) -> (RpsLedger, Vec<u64>) {
    let v = validator();
    let mut ledger = RpsLedger::new();
    let mut epoch = 0u64;
    let mut epochs = Vec::new();
    for (i, (gap, reward, stake)) in entries.iter().enumerate() {
        epoch += 1 + gap % 10;
        ledger
            .record_epoch(
                &v,
                EpochNumber::new(epoch),
                *reward,
                *stake,
                Timestamp::new((i as u64 + 1) * 60),
            )
            .unwrap();
        epochs.push(epoch);
    }
    (ledger, epochs)
}

proptest! {
    /// cumulative_rps is monotone non-decreasing across the sequence.
    #[test]
    fn rps_is_monotone(entries in prop::collection::vec(
        (0u64..10, 0u128..1_000_000, 1u128..1_000_000), 1..40)
    ) {
        let (ledger, _) = build_ledger(&entries);
        let seq = ledger.sequence(&validator());
        for pair in seq.windows(2) {
            prop_assert!(pair[1].cumulative_rps >= pair[0].cumulative_rps);
        }
    }

    /// Binary search agrees with a linear scan for every query.
    #[test]
    fn lookup_matches_linear_scan(
        entries in prop::collection::vec(
            (0u64..10, 0u128..1_000_000, 1u128..1_000_000), 1..40),
        query in 0u64..500,
    ) {
        let (ledger, _) = build_ledger(&entries);
        let v = validator();
        let seq = ledger.sequence(&v);
        let expected = seq
            .iter()
            .enumerate()
            .filter(|(_, c)| c.epoch <= EpochNumber::new(query))
            .map(|(i, _)| i)
            .last();
        match ledger.find_checkpoint_index(&v, EpochNumber::new(query)) {
            Ok(idx) => prop_assert_eq!(Some(idx), expected),
            Err(RewardsError::NotFound) => prop_assert_eq!(None, expected),
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    /// Querying an epoch before the first checkpoint always fails NotFound.
    #[test]
    fn query_before_first_fails(
        entries in prop::collection::vec(
            (0u64..10, 0u128..1_000_000, 1u128..1_000_000), 1..20),
    ) {
        let (ledger, epochs) = build_ledger(&entries);
        let first = epochs[0];
        if first > 0 {
            prop_assert_eq!(
                ledger.find_checkpoint_index(&validator(), EpochNumber::new(first - 1)),
                Err(RewardsError::NotFound)
            );
        }
    }

    /// Appending never changes earlier checkpoints (append-only history).
    #[test]
    fn append_preserves_history(
        entries in prop::collection::vec(
            (0u64..10, 0u128..1_000_000, 1u128..1_000_000), 2..30),
    ) {
        let split = entries.len() / 2;
        let (full, _) = build_ledger(&entries);
        let (prefix, _) = build_ledger(&entries[..split]);
        let v = validator();
        prop_assert_eq!(
            &full.sequence(&v)[..split],
            prefix.sequence(&v)
        );
    }
}
