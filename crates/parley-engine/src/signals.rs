//! Keyword-signal extraction over a single utterance.
//!
//! Matching is case-insensitive substring containment against fixed pattern
//! tables. Each pattern counts at most once per utterance, regardless of how
//! many times it occurs in the text.

/// Direct phrasings of the investigation commitment.
const COMMITMENT_PHRASES: &[&str] = &[
    "investigate biden",
    "look into biden",
    "biden investigation",
    "investigate corruption",
];

/// Named entities that, combined with an investigative action word anywhere
/// in the text, also count as a commitment. The two halves do not need to be
/// adjacent; paraphrases like "the Burisma matter will be investigated" must
/// still register.
const COMMITMENT_ENTITIES: &[&str] = &["biden", "burisma"];
const COMMITMENT_ACTIONS: &[&str] = &["investigate", "investigation", "look into"];

const COMPLIMENT_PATTERNS: &[&str] = &[
    "great",
    "amazing",
    "wonderful",
    "strong leader",
    "best president",
    "smart",
    "genius",
    "thank you",
    "appreciate",
    "admire",
    "respect",
    "tremendous",
    "honored",
    "grateful",
    "exceptional",
    "outstanding",
];

const RESISTANCE_PATTERNS: &[&str] = &[
    "cannot",
    "won't",
    "will not",
    "impossible",
    "against policy",
    "illegal",
    "inappropriate",
    "no",
    "refuse",
    "reject",
    "unfair",
    "unreasonable",
    "not possible",
    "unacceptable",
    "disagree",
];

const RISK_PHRASES: &[&str] = &[
    "this call is being recorded",
    "will be public",
    "whistleblower",
    "illegal request",
    "impeachment",
    "quid pro quo",
    "investigation into this",
    "transcript",
    "ethics violation",
    "constitution",
];

const MEDIA_PATTERNS: &[&str] = &[
    "fox news",
    "interview",
    "press conference",
    "statement to media",
    "public announcement",
    "television",
    "press release",
];

const AID_REQUEST_PATTERNS: &[&str] = &["release aid", "send aid", "provide aid"];

/// Structured signals derived from one utterance.
///
/// A pure function of the lowercased text: identical input always yields an
/// identical bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalBundle {
    pub explicit_commitment: bool,
    pub compliment_count: u32,
    pub resistance_count: u32,
    pub risk_phrase_count: u32,
    pub media_alignment: bool,
    pub aid_requested_without_commitment: bool,
}

/// Analyze an utterance. Never fails; empty text yields an all-zero bundle.
pub fn extract(text: &str) -> SignalBundle {
    let lower = text.to_lowercase();

    let explicit_commitment = any_hit(&lower, COMMITMENT_PHRASES)
        || (any_hit(&lower, COMMITMENT_ENTITIES) && any_hit(&lower, COMMITMENT_ACTIONS));

    let aid_requested_without_commitment =
        any_hit(&lower, AID_REQUEST_PATTERNS) && !explicit_commitment;

    SignalBundle {
        explicit_commitment,
        compliment_count: count_hits(&lower, COMPLIMENT_PATTERNS),
        resistance_count: count_hits(&lower, RESISTANCE_PATTERNS),
        risk_phrase_count: count_hits(&lower, RISK_PHRASES),
        media_alignment: any_hit(&lower, MEDIA_PATTERNS),
        aid_requested_without_commitment,
    }
}

fn any_hit(lower: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| lower.contains(p))
}

fn count_hits(lower: &str, patterns: &[&str]) -> u32 {
    patterns.iter().filter(|p| lower.contains(**p)).count() as u32
}
