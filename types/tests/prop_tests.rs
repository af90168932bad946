use proptest::prelude::*;

use vigil_types::{Address, MessageId, Timestamp};

fn arb_address() -> impl Strategy<Value = [u8; 20]> {
    prop::array::uniform20(0u8..)
}

proptest! {
    /// Address roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn address_roundtrip(bytes in arb_address()) {
        let addr = Address::new(bytes);
        prop_assert_eq!(addr.as_bytes(), &bytes);
    }

    /// Address display/parse roundtrip.
    #[test]
    fn address_hex_roundtrip(bytes in arb_address()) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address::is_zero is true only for all-zero bytes.
    #[test]
    fn address_is_zero_correct(bytes in arb_address()) {
        let addr = Address::new(bytes);
        prop_assert_eq!(addr.is_zero(), bytes == [0u8; 20]);
    }

    /// MessageId roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn message_id_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = MessageId::new(bytes);
        prop_assert_eq!(id.as_bytes(), &bytes);
    }

    /// MessageId::is_zero is true only for all-zero bytes.
    #[test]
    fn message_id_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let id = MessageId::new(bytes);
        prop_assert_eq!(id.is_zero(), bytes == [0u8; 32]);
    }

    /// Address bincode serialization roundtrip.
    #[test]
    fn address_bincode_roundtrip(bytes in arb_address()) {
        let addr = Address::new(bytes);
        let encoded = bincode::serialize(&addr).unwrap();
        let decoded: Address = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, addr);
    }

    /// MessageId bincode serialization roundtrip.
    #[test]
    fn message_id_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = MessageId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: MessageId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since_saturates(
        base in 1u64..1_000_000,
        deficit in 1u64..1_000_000,
    ) {
        let later = Timestamp::new(base + deficit);
        let earlier = Timestamp::new(base);
        prop_assert_eq!(later.elapsed_since(earlier), 0);
    }

    /// has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(
        base in 0u64..1_000_000,
        window in 0u64..1_000_000,
        offset in 0u64..2_000_000,
    ) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.has_expired(window, now), offset >= window);
    }
}
