//! Property tests for the dialogue segmenter.

use persona_core::Utterance;
use persona_dataset::segment_dialogue;
use proptest::prelude::*;

const TARGET: &str = "孔明";

fn utterance() -> impl Strategy<Value = Utterance> {
    (
        prop_oneof![Just(TARGET), Just("刘备"), Just("关羽"), Just("张飞")],
        "[a-z ]{0,6}",
    )
        .prop_map(|(speaker, text)| Utterance::new(speaker, text))
}

fn dialogue() -> impl Strategy<Value = Vec<Utterance>> {
    prop::collection::vec(utterance(), 0..40)
}

proptest! {
    #[test]
    fn pairs_never_exceed_non_target_lines(d in dialogue()) {
        let non_target = d.iter().filter(|u| !u.is_spoken_by(TARGET)).count();
        let seg = segment_dialogue(&d, TARGET);
        prop_assert!(seg.pairs.len() <= non_target);
    }

    #[test]
    fn segmentation_is_deterministic(d in dialogue()) {
        prop_assert_eq!(segment_dialogue(&d, TARGET), segment_dialogue(&d, TARGET));
    }

    #[test]
    fn stats_account_for_every_utterance(d in dialogue()) {
        let seg = segment_dialogue(&d, TARGET);
        prop_assert_eq!(seg.stats.pairs, seg.pairs.len());
        prop_assert_eq!(seg.stats.consumed + seg.stats.dropped, d.len());
        prop_assert!(seg.stats.consumed >= 2 * seg.pairs.len());
    }

    #[test]
    fn every_answered_line_yields_a_pair(d in dialogue()) {
        let answered = d
            .windows(2)
            .filter(|w| !w[0].is_spoken_by(TARGET) && w[1].is_spoken_by(TARGET))
            .count();
        prop_assert_eq!(segment_dialogue(&d, TARGET).pairs.len(), answered);
    }

    #[test]
    fn responses_are_trimmed(d in dialogue()) {
        for pair in segment_dialogue(&d, TARGET).pairs {
            prop_assert_eq!(pair.response.trim(), pair.response.as_str());
        }
    }
}
