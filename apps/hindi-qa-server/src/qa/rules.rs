//! Rule-based answer extraction
//!
//! Deterministic fallback used when the extractive model is unsure. Always
//! produces some answer: a category pattern match, the context sentence with
//! the most question keywords, the first sentence, or the raw context.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::segmenter::Segmenter;

/// Question words and particles ignored when matching keywords
const STOP_WORDS: [&str; 17] = [
    "क्या", "कौन", "कहाँ", "कब", "क्यों", "कैसे", "किस", "किसने", "किसको", "कितना", "है", "हैं",
    "था", "थे", "की", "का", "के",
];

/// Keywords this short never count toward overlap
const MIN_KEYWORD_CHARS: usize = 2;

static LOCATION_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"कहाँ|कहां|स्थित|जगह").expect("valid regex"));
static LOCATION_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^।]+में\s[^।]+(?:स्थित है|है)").expect("valid regex"));

static TIME_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"कब|वर्ष|साल|समय").expect("valid regex"));
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}(?:\s+में)?").expect("valid regex"));

static AGENT_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"किसने|कौन|किस|द्वारा").expect("valid regex"));
static AGENT_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^।]*(?:राजा|बादशाह|महाराजा|राष्ट्रपति|प्रधानमंत्री|नेता)[^।]*")
        .expect("valid regex")
});

static REASON_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"क्यों|कारण").expect("valid regex"));
static REASON_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^।]*(?:के लिए|के कारण|की वजह से)[^।]*").expect("valid regex")
});

/// Interrogative category of a Hindi question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Location,
    Time,
    Agent,
    Reason,
}

impl QuestionKind {
    /// Evaluation order
    pub const ALL: [QuestionKind; 4] = [Self::Location, Self::Time, Self::Agent, Self::Reason];

    /// Every category whose keywords appear in the question, in evaluation order
    pub fn classify(question: &str) -> Vec<QuestionKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| kind.question_pattern().is_match(question))
            .collect()
    }

    fn question_pattern(&self) -> &'static Regex {
        match self {
            Self::Location => &LOCATION_QUESTION,
            Self::Time => &TIME_QUESTION,
            Self::Agent => &AGENT_QUESTION,
            Self::Reason => &REASON_QUESTION,
        }
    }

    /// Category-specific answer found in the context, if any
    pub fn extract(&self, context: &str) -> Option<String> {
        let found = match self {
            Self::Location => LOCATION_ANSWER.find(context).map(|m| m.as_str()),
            Self::Time => clause_with_year(context),
            Self::Agent => AGENT_ANSWER.find(context).map(|m| m.as_str()),
            Self::Reason => REASON_ANSWER.find(context).map(|m| m.as_str()),
        };
        found
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Danda-delimited clause around the first 4-digit year
fn clause_with_year(context: &str) -> Option<&str> {
    YEAR.find_iter(context).find_map(|year| {
        let pattern = format!("[^।]*{}[^।]*", regex::escape(year.as_str()));
        Regex::new(&pattern)
            .ok()
            .and_then(|clause| clause.find(context))
            .map(|m| m.as_str())
    })
}

/// Deterministic answer extractor
#[derive(Debug, Clone, Default)]
pub struct RuleExtractor {
    segmenter: Segmenter,
}

impl RuleExtractor {
    pub fn new(segmenter: Segmenter) -> Self {
        Self { segmenter }
    }

    /// Answer `question` from `context`. Never fails; same input, same output.
    pub fn extract(&self, question: &str, context: &str) -> String {
        for kind in QuestionKind::classify(question) {
            if let Some(answer) = kind.extract(context) {
                tracing::debug!(?kind, "Rule-based answer from question category");
                return answer;
            }
        }

        if let Some(sentence) = self.best_overlap(question, context) {
            return sentence;
        }

        self.segmenter
            .split(context)
            .next()
            .unwrap_or_else(|| context.to_string())
    }

    /// Context sentence sharing the most keywords with the question.
    /// Ties go to the earliest sentence; zero overlap yields `None`.
    fn best_overlap(&self, question: &str, context: &str) -> Option<String> {
        let stop_words: HashSet<&str> = STOP_WORDS.into_iter().collect();
        // Sentences come back normalized, so keywords must be too
        let question = self.segmenter.normalize(question);
        let keywords: HashSet<&str> = question
            .split_whitespace()
            .filter(|word| !stop_words.contains(word))
            .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS)
            .collect();

        let mut best: Option<(usize, String)> = None;
        for sentence in self.segmenter.split(context) {
            let matches = keywords
                .iter()
                .filter(|word| sentence.contains(**word))
                .count();
            if matches > best.as_ref().map_or(0, |(count, _)| *count) {
                best = Some((matches, sentence));
            }
        }
        best.map(|(_, sentence)| sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAJ: &str = "ताजमहल भारत के आगरा शहर में यमुना नदी के किनारे स्थित है। \
        इसका निर्माण मुगल बादशाह शाहजहाँ ने अपनी पत्नी मुमताज़ महल की याद में करवाया था। \
        ताजमहल को 1983 में यूनेस्को की विश्व धरोहर स्थल घोषित किया गया था।";

    fn extract(question: &str, context: &str) -> String {
        RuleExtractor::default().extract(question, context)
    }

    #[test]
    fn test_classify() {
        assert_eq!(QuestionKind::classify("ताजमहल कहाँ है?"), vec![QuestionKind::Location]);
        assert_eq!(QuestionKind::classify("यह कब बना?"), vec![QuestionKind::Time]);
        assert_eq!(
            QuestionKind::classify("किसने और क्यों बनवाया?"),
            vec![QuestionKind::Agent, QuestionKind::Reason]
        );
        assert!(QuestionKind::classify("यह क्या है?").is_empty());
    }

    #[test]
    fn test_location_answer() {
        assert_eq!(
            extract("ताजमहल कहाँ स्थित है?", TAJ),
            "ताजमहल भारत के आगरा शहर में यमुना नदी के किनारे स्थित है"
        );
    }

    #[test]
    fn test_time_answer_returns_clause_with_year() {
        assert_eq!(
            extract("इसे विश्व धरोहर कब घोषित किया गया?", TAJ),
            "ताजमहल को 1983 में यूनेस्को की विश्व धरोहर स्थल घोषित किया गया था"
        );
    }

    #[test]
    fn test_agent_answer() {
        assert_eq!(
            extract("इसका निर्माण किसने करवाया?", TAJ),
            "इसका निर्माण मुगल बादशाह शाहजहाँ ने अपनी पत्नी मुमताज़ महल की याद में करवाया था"
        );
    }

    #[test]
    fn test_reason_answer() {
        let context = "किसान खेती के लिए बारिश पर निर्भर हैं। फसल अच्छी हुई।";
        assert_eq!(
            extract("किसान बारिश पर क्यों निर्भर हैं?", context),
            "किसान खेती के लिए बारिश पर निर्भर हैं"
        );
    }

    #[test]
    fn test_category_without_match_falls_through_to_overlap() {
        let context = "गंगा नदी हिमालय से निकलती है। यह बहुत पवित्र मानी जाती है।";
        // Time keyword but no year in the context
        assert_eq!(
            extract("पवित्र मानी जाने का समय?", context),
            "यह बहुत पवित्र मानी जाती है।"
        );
    }

    #[test]
    fn test_overlap_ties_pick_first_sentence() {
        let context = "यह एक वाक्य है। दिल्ली सुंदर शहर है। मुंबई सुंदर शहर है।";
        assert_eq!(extract("सुंदर शहर", context), "दिल्ली सुंदर शहर है।");
    }

    #[test]
    fn test_no_overlap_returns_first_sentence() {
        let context = "पहला वाक्य यहाँ है। दूसरा वाक्य यहाँ है।";
        assert_eq!(extract("क्या?", context), "पहला वाक्य यहाँ है।");
    }

    #[test]
    fn test_empty_context_is_returned_as_is() {
        assert_eq!(extract("क्या?", "   "), "   ");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let questions = [
            "ताजमहल कहाँ स्थित है?",
            "इसे कब घोषित किया गया?",
            "मुमताज़ महल कौन थी?",
            "यह क्यों प्रसिद्ध है?",
            "यमुना नदी",
        ];
        for question in questions {
            let first = extract(question, TAJ);
            for _ in 0..5 {
                assert_eq!(extract(question, TAJ), first);
            }
        }
    }
}
