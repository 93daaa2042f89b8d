use proptest::prelude::*;

use vesta_types::{Address, EpochNumber, Timestamp};

proptest! {
    /// Timestamp bincode roundtrip.
    #[test]
    fn timestamp_bincode_roundtrip(secs in any::<u64>()) {
        let t = Timestamp::new(secs);
        let encoded = bincode::serialize(&t).unwrap();
        let decoded: Timestamp = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, t);
    }

    /// EpochNumber ordering matches the underlying integer ordering.
    #[test]
    fn epoch_ordering_matches_u64(a in any::<u64>(), b in any::<u64>()) {
        let (ea, eb) = (EpochNumber::new(a), EpochNumber::new(b));
        prop_assert_eq!(ea.cmp(&eb), a.cmp(&b));
    }

    /// next() never goes backwards, even at the saturation boundary.
    #[test]
    fn epoch_next_is_monotone(n in any::<u64>()) {
        let e = EpochNumber::new(n);
        prop_assert!(e.next() >= e);
    }

    /// elapsed_since is the saturating difference.
    #[test]
    fn elapsed_is_saturating_diff(start in any::<u64>(), now in any::<u64>()) {
        let t = Timestamp::new(start);
        prop_assert_eq!(t.elapsed_since(Timestamp::new(now)), now.saturating_sub(start));
    }

    /// Address roundtrips through its string form.
    #[test]
    fn address_roundtrip(suffix in "[a-z0-9]{1,40}") {
        let raw = format!("vst_{suffix}");
        let addr = Address::new(raw.clone());
        prop_assert_eq!(addr.as_str(), raw.as_str());
        prop_assert!(addr.is_valid());
    }
}
