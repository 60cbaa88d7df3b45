use serde::{Deserialize, Serialize};

/// Closed set of archetypes a result can be summarized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaId {
    AllRounder,
    Polished,
    Balanced,
    Rebuilder,
    Charmer,
    HiddenGem,
}

impl PersonaId {
    pub const ALL: [PersonaId; 6] = [
        PersonaId::AllRounder,
        PersonaId::Polished,
        PersonaId::Balanced,
        PersonaId::Rebuilder,
        PersonaId::Charmer,
        PersonaId::HiddenGem,
    ];

    /// Substituted whenever an id cannot be matched.
    pub const DEFAULT: PersonaId = PersonaId::Balanced;

    pub const KNOWN_IDS: [&'static str; 6] = [
        PersonaId::AllRounder.as_str(),
        PersonaId::Polished.as_str(),
        PersonaId::Balanced.as_str(),
        PersonaId::Rebuilder.as_str(),
        PersonaId::Charmer.as_str(),
        PersonaId::HiddenGem.as_str(),
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PersonaId::AllRounder => "all_rounder",
            PersonaId::Polished => "polished",
            PersonaId::Balanced => "balanced",
            PersonaId::Rebuilder => "rebuilder",
            PersonaId::Charmer => "charmer",
            PersonaId::HiddenGem => "hidden_gem",
        }
    }

    /// Maps free text (typically narrator output) onto the closed set.
    pub fn from_untrusted(raw: &str) -> Self {
        let id = normalize_persona_id(raw, &Self::KNOWN_IDS, Self::DEFAULT.as_str());
        Self::ALL
            .into_iter()
            .find(|persona| persona.as_str() == id)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn profile(self) -> &'static PersonaProfile {
        &PROFILES[self as usize]
    }
}

/// Lower-cases and trims `raw`, returning the matching entry of `known` or `default`.
pub fn normalize_persona_id<'a>(raw: &str, known: &[&'a str], default: &'a str) -> &'a str {
    let candidate = raw.trim().to_lowercase();
    known
        .iter()
        .copied()
        .find(|id| *id == candidate)
        .unwrap_or(default)
}

/// Narrative copy used when the narrator does not provide one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaProfile {
    pub id: PersonaId,
    pub title: &'static str,
    pub tagline: &'static str,
    pub advice: &'static str,
}

// Indexed by discriminant; order must follow `PersonaId`.
const PROFILES: [PersonaProfile; 6] = [
    PersonaProfile {
        id: PersonaId::AllRounder,
        title: "The All-Rounder",
        tagline: "Strong across every dimension.",
        advice: "You have the fundamentals covered. Focus on meeting more of the right people.",
    },
    PersonaProfile {
        id: PersonaId::Polished,
        title: "Polished but Incomplete",
        tagline: "Most of the picture is there, one piece is missing.",
        advice: "Find your weakest category and give it a month of deliberate attention.",
    },
    PersonaProfile {
        id: PersonaId::Balanced,
        title: "The Steady Average",
        tagline: "No glaring weakness, no standout strength yet.",
        advice: "Pick one category to turn into a strength; small consistent steps add up.",
    },
    PersonaProfile {
        id: PersonaId::Rebuilder,
        title: "Ready for a Rebuild",
        tagline: "A fresh start will pay off quickly.",
        advice: "Start with appearance and mindset: they are the fastest to improve.",
    },
    PersonaProfile {
        id: PersonaId::Charmer,
        title: "The Natural Charmer",
        tagline: "People warm to you the moment you start talking.",
        advice: "Back your charm with a consistent look so first impressions match.",
    },
    PersonaProfile {
        id: PersonaId::HiddenGem,
        title: "The Hidden Gem",
        tagline: "Great qualities that few people get to see.",
        advice: "Put yourself in more rooms; your strengths show once people meet you.",
    },
];
