//! Static content: system prompt, therapy catalog, quick actions and the
//! fixed copy shown around the chat.

use serde::Serialize;

/// Persona and safety instruction sent as the system instruction.
pub const SYSTEM_PROMPT: &str = r#"You are "AyurCare Assistant," an AI-powered Ayurvedic Customer Support Chatbot for a wellness mobile/web application.

🎯 ROLE:
- Assist users with Ayurvedic treatment information (therapies, concepts, lifestyle).
- Help navigate the app (booking, scheduling, viewing plans, payments).
- Provide general educational guidance, NOT medical diagnosis.

🧠 KNOWLEDGE SCOPE:
- Basic Concepts: Vata, Pitta, Kapha, Prakriti, Agni, Ama.
- Common Treatments: Panchakarma, Abhyanga, Shirodhara, Nasya, Basti.
- Diet and lifestyle according to Doshas.
- Preventive wellness practices.

🚫 SAFETY & COMPLIANCE (CRITICAL):
- DO NOT provide medical diagnosis.
- DO NOT prescribe specific medicines for diseases.
- ALWAYS include a disclaimer: "Please consult a qualified Ayurvedic doctor for personalized treatment."
- For urgent/severe symptoms: Advise immediate medical attention.

💬 STYLE:
- Polite, calm, empathetic, and culturally respectful.
- Use simple, easy-to-understand language.
- Ask clarifying questions (age range, lifestyle) without being intrusive.

🌿 RESPONSE STRUCTURE:
1. Acknowledge the user's concern.
2. Provide general Ayurvedic explanation.
3. Suggest safe lifestyle or wellness tips.
4. Recommend consulting an Ayurvedic practitioner.
5. Offer help with app features (e.g., "I can help you book a consultation")."#;

/// Footer shown under the input.
pub const DISCLAIMER: &str = "AyurCare provides wellness guidance. Not a substitute for medical diagnosis. Consult an Ayurvedic doctor.";

/// Input placeholder.
pub const INPUT_PLACEHOLDER: &str = "Ask about treatments, doshas, or booking...";

pub const HEADER_TITLE: &str = "Wellness Assistant";
pub const HEADER_STATUS: &str = "Live Support";

/// Sidebar navigation labels. Only the first is a working view.
pub const NAV_ITEMS: [&str; 4] = ["Support Chat", "Appointments", "My Wellness", "Settings"];

/// Trial card shown at the bottom of the sidebar.
pub struct TrialCard {
    pub title: &'static str,
    pub body: &'static str,
    pub button: &'static str,
}

pub const TRIAL_CARD: TrialCard = TrialCard {
    title: "New to Ayurveda?",
    body: "Start your journey with a free 15-minute consultation.",
    button: "Request Trial",
};

/// Therapy grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TherapyCategory {
    Detox,
    Relaxation,
    Skin,
    Vitality,
}

impl TherapyCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Detox => "Detox",
            Self::Relaxation => "Relaxation",
            Self::Skin => "Skin",
            Self::Vitality => "Vitality",
        }
    }
}

/// A therapy offered by the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Therapy {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub benefits: &'static [&'static str],
    pub duration: &'static str,
    pub category: TherapyCategory,
}

pub const THERAPIES: &[Therapy] = &[
    Therapy {
        id: "1",
        name: "Abhyanga",
        description: "A warm oil massage using herb-infused oils tailored to your dosha.",
        benefits: &["Stress reduction", "Improved circulation", "Skin health"],
        duration: "60 mins",
        category: TherapyCategory::Relaxation,
    },
    Therapy {
        id: "2",
        name: "Shirodhara",
        description: "A soothing flow of warm oil over the forehead to calm the nervous system.",
        benefits: &["Sleep quality", "Mental clarity", "Anxiety relief"],
        duration: "45 mins",
        category: TherapyCategory::Relaxation,
    },
    Therapy {
        id: "3",
        name: "Panchakarma",
        description: "The ultimate Ayurvedic detoxification and rejuvenation program.",
        benefits: &["Full body detox", "System balance", "Enhanced immunity"],
        duration: "7-21 days",
        category: TherapyCategory::Detox,
    },
];

/// Look up a therapy by id.
pub fn therapy(id: &str) -> Option<&'static Therapy> {
    THERAPIES.iter().find(|t| t.id == id)
}

/// What a quick action does when chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuickActionKind {
    BookSession,
    ViewDosha,
    ViewPlan,
}

impl QuickActionKind {
    /// Wire tag (`BOOK_SESSION`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            Self::BookSession => "BOOK_SESSION",
            Self::ViewDosha => "VIEW_DOSHA",
            Self::ViewPlan => "VIEW_PLAN",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BOOK_SESSION" => Some(Self::BookSession),
            "VIEW_DOSHA" => Some(Self::ViewDosha),
            "VIEW_PLAN" => Some(Self::ViewPlan),
            _ => None,
        }
    }

    /// Text placed in the input. Never sent automatically.
    pub fn prefill(self) -> &'static str {
        match self {
            Self::BookSession => "I'd like to book an Ayurvedic therapy session.",
            Self::ViewDosha => "Can you tell me more about Doshas and how to find mine?",
            Self::ViewPlan => "Where can I find my personalized treatment plan in the app?",
        }
    }
}

/// A shortcut chip above the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub action: QuickActionKind,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        title: "Book Therapy",
        description: "Schedule a healing session with our practitioners.",
        icon: "🗓️",
        action: QuickActionKind::BookSession,
    },
    QuickAction {
        title: "My Dosha",
        description: "View your Prakriti and Vikriti assessment.",
        icon: "🧘",
        action: QuickActionKind::ViewDosha,
    },
    QuickAction {
        title: "Treatment Plan",
        description: "Track your personalized wellness protocol.",
        icon: "📋",
        action: QuickActionKind::ViewPlan,
    },
];
