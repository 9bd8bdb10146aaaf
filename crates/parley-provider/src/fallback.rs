//! Canned counterpart lines used when the generative-text call fails.
//!
//! Selection rotates with conversation length rather than drawing randomly,
//! so a given session replays identically.

const FALLBACK_LINES: &[&str] = &[
    "We do so much for Ukraine. We spend so much effort and time.",
    "I need you to do us a favor though. There's a lot of talk about Biden's son.",
    "Look into it. That sounds horrible to me.",
    "I'll tell you what, if you make this investigation happen, the military aid will flow very quickly.",
    "Nobody has been tougher on Russia than me, believe me.",
    "The conversation is perfect, totally perfect. Ask anybody.",
    "We're looking very strongly at releasing that aid. Very strongly.",
    "I hear you've made progress. That's tremendous, really tremendous.",
];

/// The opener returned from session start.
pub const OPENING_LINE: &str = "We do so much for Ukraine. We spend so much effort and time. \
     Much more than European countries are doing. And I have to tell you, \
     we're looking for some reciprocity here, OK?";

pub fn fallback_line(turn: usize) -> &'static str {
    FALLBACK_LINES[turn % FALLBACK_LINES.len()]
}
