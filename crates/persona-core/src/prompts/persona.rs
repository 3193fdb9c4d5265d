//! Persona context: the role the fine-tuned model is asked to play.
//!
//! The context is sent ahead of the user prompt so the adapter's persona is
//! activated before the question arrives.

/// Context template: placeholder is replaced with the persona's title and name.
pub const PERSONA_SYSTEM_TEMPLATE: &str = "现在你是{persona}";

/// Persona the bundled dataset targets (Zhuge Liang, chancellor of Shu Han).
pub const DEFAULT_PERSONA: &str = "大汉丞相诸葛孔明";

/// Fixed sample prompt used to spot-check a trained adapter.
pub const DEFAULT_SAMPLE_PROMPT: &str = "丞相，孟获此人着实可恶，要不咱们把他砍了。";

/// Build the persona context for the given persona.
pub fn persona_system_context(persona: &str) -> String {
    PERSONA_SYSTEM_TEMPLATE.replace("{persona}", persona.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_matches_trained_persona() {
        assert_eq!(persona_system_context(DEFAULT_PERSONA), "现在你是大汉丞相诸葛孔明");
    }

    #[test]
    fn persona_is_trimmed() {
        assert_eq!(persona_system_context("  卧龙先生\n"), "现在你是卧龙先生");
    }
}
