use proptest::prelude::*;

use vivarium_genome::{base60_width, from_base60, from_base64, to_base60, to_base64, Genome};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_base60_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..48)) {
        let genome = Genome::from_bytes(bytes);
        let encoded = to_base60(&genome);
        prop_assert_eq!(encoded.len(), base60_width(genome.len()));
        let decoded = from_base60(&encoded).unwrap();
        prop_assert_eq!(decoded, genome);
    }

    #[test]
    fn test_base64_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..48)) {
        let genome = Genome::from_bytes(bytes);
        let decoded = from_base64(&to_base64(&genome)).unwrap();
        prop_assert_eq!(decoded, genome);
    }

    #[test]
    fn test_equal_lengths_encode_at_equal_widths(
        a in prop::collection::vec(any::<u8>(), 16),
        b in prop::collection::vec(any::<u8>(), 16),
    ) {
        let wa = to_base60(&Genome::from_bytes(a)).len();
        let wb = to_base60(&Genome::from_bytes(b)).len();
        prop_assert_eq!(wa, wb);
    }
}
