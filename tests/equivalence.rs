use leibniz_series::{Accumulator, Mode, full_recompute};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn modes_agree_after_any_history(history in prop::collection::vec(1u32..300, 1..8)) {
        let mut inc = Accumulator::new(Mode::Incremental);
        let mut full = Accumulator::new(Mode::FullRecompute);
        for &n in &history {
            let a = inc.approximate(n).unwrap();
            let b = full.approximate(n).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(inc.samples(), full.samples());
        }
        let last = *history.last().unwrap();
        let baseline = full_recompute(last).unwrap();
        prop_assert_eq!(inc.samples(), baseline.as_slice());
    }

    #[test]
    fn extension_evaluates_only_new_terms(n in 1u32..200, k in 1u32..200) {
        let mut acc = Accumulator::new(Mode::Incremental);
        acc.approximate(n).unwrap();
        let before = acc.stats().terms_evaluated;
        acc.approximate(n + k).unwrap();
        prop_assert_eq!(acc.stats().terms_evaluated - before, u64::from(k));
    }

    #[test]
    fn shrinking_evaluates_nothing(n in 2u32..300, m in 1u32..300) {
        prop_assume!(m < n);
        let mut acc = Accumulator::new(Mode::Incremental);
        acc.approximate(n).unwrap();
        let before = acc.stats().terms_evaluated;
        let sample = acc.approximate(m).unwrap();
        prop_assert_eq!(acc.stats().terms_evaluated, before);
        prop_assert_eq!(sample.term_count(), m);
        prop_assert_eq!(acc.samples().len(), m as usize);
    }
}
