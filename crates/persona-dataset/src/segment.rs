//! Dialogue segmenter: speaker-tagged utterances -> instruction/response pairs.
//!
//! A pair starts at a non-target utterance that is immediately answered by the target
//! speaker. The target's reply runs until another speaker interrupts or the transcript
//! ends, so every contiguous target-speaker line after the instruction is merged into a
//! single response. Utterances that never open or close a pair are dropped.

use persona_core::{QaPair, Utterance};
use serde::Serialize;

/// How much of the transcript ended up in pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentStats {
    pub pairs: usize,
    /// Utterances used as an instruction or merged into a response.
    pub consumed: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub pairs: Vec<QaPair>,
    pub stats: SegmentStats,
}

/// Segment `utterances` into pairs answered by `target_speaker`.
///
/// Response texts are concatenated without a separator and the result is trimmed;
/// the instruction is kept verbatim. Pure and deterministic.
pub fn segment_dialogue(utterances: &[Utterance], target_speaker: &str) -> Segmentation {
    let mut pairs = Vec::new();
    let mut consumed = 0;
    let mut i = 0;

    while i < utterances.len() {
        let instruction = &utterances[i];
        let answered = !instruction.is_spoken_by(target_speaker)
            && utterances
                .get(i + 1)
                .is_some_and(|next| next.is_spoken_by(target_speaker));
        if !answered {
            i += 1;
            continue;
        }

        // Merge the whole contiguous run of target lines. Whether a long run should be
        // split into several replies is unresolved; keep the run intact.
        let mut response = String::new();
        let mut j = i + 1;
        while let Some(reply) = utterances
            .get(j)
            .filter(|u| u.is_spoken_by(target_speaker))
        {
            response.push_str(&reply.text);
            j += 1;
        }

        pairs.push(QaPair::new(instruction.text.clone(), response.trim()));
        consumed += j - i;
        i = j;
    }

    let stats = SegmentStats {
        pairs: pairs.len(),
        consumed,
        dropped: utterances.len() - consumed,
    };
    Segmentation { pairs, stats }
}

/// Pairs only; see [`segment_dialogue`].
pub fn extract_qa_pairs(utterances: &[Utterance], target_speaker: &str) -> Vec<QaPair> {
    segment_dialogue(utterances, target_speaker).pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    const KM: &str = "孔明";

    fn u(speaker: &str, text: &str) -> Utterance {
        Utterance::new(speaker, text)
    }

    #[test]
    fn merges_consecutive_target_lines() {
        let dialogue = vec![u("A", "hi"), u(KM, "hello"), u(KM, " there")];
        let seg = segment_dialogue(&dialogue, KM);
        assert_eq!(seg.pairs, vec![QaPair::new("hi", "hello there")]);
        assert_eq!(
            seg.stats,
            SegmentStats {
                pairs: 1,
                consumed: 3,
                dropped: 0
            }
        );
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        let seg = segment_dialogue(&[], KM);
        assert!(seg.pairs.is_empty());
        assert_eq!(seg.stats, SegmentStats::default());
    }

    #[test]
    fn unanswered_lines_produce_nothing() {
        let dialogue = vec![u("刘备", "先生"), u("关羽", "大哥"), u("张飞", "哼")];
        let seg = segment_dialogue(&dialogue, KM);
        assert!(seg.pairs.is_empty());
        assert_eq!(seg.stats.dropped, 3);
    }

    #[test]
    fn only_the_line_right_before_the_reply_is_the_instruction() {
        let dialogue = vec![
            u("关羽", "此人何能"),
            u("刘备", "先生何以教我？"),
            u(KM, "将军欲成霸业，"),
            u(KM, "北让曹操占天时。"),
            u("刘备", "善！"),
        ];
        let seg = segment_dialogue(&dialogue, KM);
        assert_eq!(
            seg.pairs,
            vec![QaPair::new("先生何以教我？", "将军欲成霸业，北让曹操占天时。")]
        );
        assert_eq!(seg.stats.consumed, 3);
        assert_eq!(seg.stats.dropped, 2);
    }

    #[test]
    fn leading_target_lines_are_dropped() {
        let dialogue = vec![u(KM, "亮有一言"), u("刘备", "请讲"), u(KM, "可取西川")];
        let seg = segment_dialogue(&dialogue, KM);
        assert_eq!(seg.pairs, vec![QaPair::new("请讲", "可取西川")]);
        assert_eq!(seg.stats.dropped, 1);
    }

    #[test]
    fn trailing_target_block_is_emitted() {
        let dialogue = vec![u("A", "q1"), u(KM, "a1"), u("B", "q2"), u(KM, "a2"), u(KM, "a3")];
        let pairs = extract_qa_pairs(&dialogue, KM);
        assert_eq!(
            pairs,
            vec![QaPair::new("q1", "a1"), QaPair::new("q2", "a2a3")]
        );
    }

    #[test]
    fn back_to_back_exchanges_each_form_a_pair() {
        let dialogue = vec![u("A", "q1"), u(KM, "a1"), u("A", "q2"), u(KM, "a2")];
        assert_eq!(extract_qa_pairs(&dialogue, KM).len(), 2);
    }

    #[test]
    fn response_is_trimmed_but_instruction_is_verbatim() {
        let dialogue = vec![u("A", "  q  "), u(KM, "  a "), u(KM, " b  ")];
        assert_eq!(extract_qa_pairs(&dialogue, KM), vec![QaPair::new("  q  ", "a  b")]);
    }

    #[test]
    fn speaker_match_is_exact() {
        let dialogue = vec![u("A", "q"), u("诸葛亮", "a")];
        assert!(extract_qa_pairs(&dialogue, KM).is_empty());
        assert_eq!(extract_qa_pairs(&dialogue, "诸葛亮").len(), 1);
    }
}
