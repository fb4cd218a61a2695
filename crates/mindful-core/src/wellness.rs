//! Canned wellness tips served alongside the companion chat.

use rand::seq::SliceRandom;

pub const WELLNESS_TIPS: [&str; 8] = [
    "Take three deep breaths before responding to any stressful situation. This simple pause can help you respond rather than react.",
    "Practice the 5-4-3-2-1 grounding technique: Notice 5 things you see, 4 you can touch, 3 you hear, 2 you smell, and 1 you taste.",
    "Set aside 5 minutes today for gratitude. Write down three things you're thankful for, no matter how small.",
    "Movement is medicine. Even a 10-minute walk can boost your mood and clear your mind.",
    "Your feelings are valid, and it's okay to not be okay. Reach out to someone you trust when you need support.",
    "Quality sleep is crucial for mental health. Try to maintain a consistent sleep schedule.",
    "Limit social media if it's affecting your mood. Take breaks and be mindful of your screen time.",
    "Practice saying 'no' to protect your energy. Setting boundaries is an act of self-care.",
];

pub fn random_tip() -> &'static str {
    WELLNESS_TIPS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(WELLNESS_TIPS[0])
}
