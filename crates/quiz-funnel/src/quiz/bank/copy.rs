use crate::quiz::domain::{Category, Level};

/// Description and suggestion shown next to a category result.
pub fn category_copy(category: Category, level: Level) -> (&'static str, &'static str) {
    match (category, level) {
        (Category::Appearance, Level::Green) => (
            "Your look is intentional and well maintained.",
            "Keep refreshing your style each season so it stays current.",
        ),
        (Category::Appearance, Level::Yellow) => (
            "You make an effort, but your look is not yet consistent.",
            "Pick one signature outfit and a simple grooming routine you can repeat.",
        ),
        (Category::Appearance, Level::Red) => (
            "First impressions are working against you.",
            "Start with fit and grooming: a tailored basic wardrobe changes the most.",
        ),
        (Category::Conversation, Level::Green) => (
            "People enjoy talking with you and want to continue.",
            "Use your conversations to move toward concrete plans.",
        ),
        (Category::Conversation, Level::Yellow) => (
            "Conversations go well once they start, but stall at times.",
            "Prepare a few open questions and follow up on what you hear.",
        ),
        (Category::Conversation, Level::Red) => (
            "Conversations tend to end before a connection forms.",
            "Practice asking one follow-up question for every answer you get.",
        ),
        (Category::SocialPresence, Level::Green) => (
            "You have a wide circle and new people find you easily.",
            "Invest in the relationships that matter most to you.",
        ),
        (Category::SocialPresence, Level::Yellow) => (
            "You have some reach, but few new encounters.",
            "Join one recurring activity where the same people meet every week.",
        ),
        (Category::SocialPresence, Level::Red) => (
            "Few people get the chance to meet you.",
            "Say yes to the next invitation and refresh your profiles.",
        ),
        (Category::Mindset, Level::Green) => (
            "You are confident and resilient.",
            "Share that energy: confidence is attractive when it stays relaxed.",
        ),
        (Category::Mindset, Level::Yellow) => (
            "You believe in yourself on good days.",
            "Write down small wins each week to build steady confidence.",
        ),
        (Category::Mindset, Level::Red) => (
            "Self-doubt is holding you back more than anything else.",
            "Set one small, achievable goal and celebrate reaching it.",
        ),
    }
}
