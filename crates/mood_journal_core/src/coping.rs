//! crates/mood_journal_core/src/coping.rs
//!
//! Fixed coping-suggestion content shown after a mood is logged.

const HAPPY: &[&str] = &[
    "Share your positive energy with someone today",
    "Practice gratitude - write down 3 things you're thankful for",
];

const SAD: &[&str] = &[
    "Reach out to a friend you haven't talked to in a while",
    "Take a mindful walk outside",
    "Consider professional support if this feeling persists",
];

const ANXIOUS: &[&str] = &[
    "Practice deep breathing exercises",
    "Try progressive muscle relaxation",
];

const EXCITED: &[&str] = &[
    "Channel the energy into something you've been putting off",
    "Call a friend and tell them the news",
];

const GENERIC: &[&str] = &["Take deep breaths", "Practice gratitude", "Talk to a friend"];

/// Looks up suggestions by exact mood label; unknown labels get the generic list.
pub fn suggestions_for(mood: &str) -> &'static [&'static str] {
    match mood {
        "Happy" => HAPPY,
        "Sad" => SAD,
        "Anxious" => ANXIOUS,
        "Excited" => EXCITED,
        _ => GENERIC,
    }
}
