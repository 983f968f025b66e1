use rand::Rng;

/// Themes for the word of the day
pub const TOPICS: [&str; 9] = [
    "food",
    "travel",
    "emotions",
    "daily routine",
    "weather",
    "shopping",
    "school",
    "dating",
    "emergency",
];

pub fn random_topic() -> &'static str {
    TOPICS[rand::rng().random_range(0..TOPICS.len())]
}
