/// Phrases the speech model emits that correspond to no spoken audio.
///
/// These are sign-off and caption-credit boilerplate the model has memorized
/// from its training data; they show up verbatim on quiet or trailing
/// segments. Tuned for Korean-language recordings.
pub const DEFAULT_HALLUCINATION_PHRASES: &[&str] = &[
    "한글자막 by 한효정",
    "자막제공자",
    "구독과 좋아요 부탁드립니다",
    "시청해주셔서 감사합니다",
    "시청해 주셔서 감사합니다",
    "이 영상은 유료광고를 포함하고 있습니다",
    "다음 영상에서 만나요",
];

/// Strips known hallucinated phrases from raw transcript text.
///
/// A pure text-to-text transform: remove every occurrence of each phrase,
/// then collapse redundant whitespace. Idempotent, so re-cleaning an already
/// cleaned transcript changes nothing.
#[derive(Debug, Clone)]
pub struct TranscriptCleaner {
    phrases: Vec<String>,
}

impl Default for TranscriptCleaner {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_HALLUCINATION_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl TranscriptCleaner {
    /// Default phrase list plus extra phrases from configuration.
    pub fn with_extra_phrases(extra: &[String]) -> Self {
        let mut cleaner = Self::default();
        cleaner
            .phrases
            .extend(extra.iter().filter(|p| !p.is_empty()).cloned());
        cleaner
    }

    pub fn clean(&self, text: &str) -> String {
        // Collapsing whitespace can re-form a phrase that had irregular
        // internal spacing, and removing a phrase can butt two halves of
        // another occurrence together. Alternate the two passes until the
        // text stops changing.
        let mut cleaned = collapse_whitespace(text);
        loop {
            let mut pass = cleaned.clone();
            for phrase in &self.phrases {
                if phrase.is_empty() {
                    continue;
                }
                while pass.contains(phrase.as_str()) {
                    pass = pass.replace(phrase.as_str(), "");
                }
            }
            pass = collapse_whitespace(&pass);
            if pass == cleaned {
                return pass;
            }
            cleaned = pass;
        }
    }
}

/// Collapse runs of blanks within each line and drop empty lines.
fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
