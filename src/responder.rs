//! The coach: keyword matching over an ordered list of topics.
//!
//! The utterance is lower-cased and checked against each topic's keywords by
//! substring containment. Topics are tried in declaration order and the first
//! hit wins, so "hello, motivate me" gets the motivation reply. Randomness
//! (quote choice, fallback choice) comes from the caller's RNG.

use rand::Rng;
use serde::Deserialize;
use tracing::debug;

pub const MOTIVATION_PREFIX: &str = "Here's some motivation for you: ";
const MOTIVATION_SUFFIX: &str =
    "\n\nRemember, every champion was once a beginner. Keep pushing!";

pub const QUOTES: [&str; 15] = [
    "The secret of getting ahead is getting started. — Mark Twain",
    "Small daily improvements are the key to staggering long-term results.",
    "Discipline is the bridge between goals and accomplishment. — Jim Rohn",
    "Success is the sum of small efforts repeated day in and day out.",
    "Don't watch the clock; do what it does. Keep going. — Sam Levenson",
    "The only way to do great work is to love what you do. — Steve Jobs",
    "Motivation gets you started. Habit keeps you going. — Jim Ryun",
    "Your habits shape your identity, and your identity shapes your habits.",
    "Excellence is not a singular act, but a habit. You are what you repeatedly do.",
    "The difference between who you are and who you want to be is what you do.",
    "Progress, not perfection, is what we should be asking of ourselves.",
    "Every action you take is a vote for the type of person you wish to become.",
    "Champions don't show up to get everything they want; they show up to give everything they have.",
    "The pain of discipline is far less than the pain of regret.",
    "You don't have to be extreme, just consistent.",
];

/// Replies used when nothing matches and the fallback mode is `Random`.
pub const COACH_RESPONSES: [&str; 10] = [
    "That's a great mindset! Remember, consistency beats intensity. Keep showing up every day.",
    "You've got this! Focus on progress, not perfection. Every small step counts.",
    "I believe in you! The fact that you're here working on your habits shows real commitment.",
    "Excellent question! The key to building habits is making them so easy you can't say no.",
    "Remember: You're not just building habits, you're building the person you want to become.",
    "Stay focused on your 'why'. When you know your purpose, discipline becomes easier.",
    "Don't break the chain! Your streak is your superpower. Protect it.",
    "Celebrate small wins! Each completed task is proof that you can do hard things.",
    "The best time to start was yesterday. The second best time is now. Let's go!",
    "Your future self will thank you for the discipline you show today.",
];

pub const HELP_MENU: &str = "Great question! 💡 I'm here to help with:\n\n\
• **Fitness** - Workouts, body building, weight loss\n\
• **Habits** - Building routines that stick\n\
• **Productivity** - Getting more done\n\
• **Study tips** - Learning effectively\n\
• **Mental wellness** - Stress, sleep, balance\n\n\
Try asking me something like:\n\
- 'How to build muscle?'\n\
- 'Tips for better sleep'\n\
- 'How to stay focused?'\n\n\
What would you like help with?";

/// Conversation topics, in matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Motivation,
    Fatigue,
    Failure,
    Habit,
    Procrastination,
    Focus,
    Greeting,
    Gratitude,
    Fitness,
    Weight,
    Study,
    Sleep,
    Stress,
    Productivity,
    Goals,
}

enum Reply {
    Fixed(&'static str),
    Quote,
}

struct Bucket {
    topic: Topic,
    keywords: &'static [&'static str],
    reply: Reply,
}

const BUCKETS: &[Bucket] = &[
    Bucket {
        topic: Topic::Motivation,
        keywords: &["motivat", "inspir"],
        reply: Reply::Quote,
    },
    Bucket {
        topic: Topic::Fatigue,
        keywords: &["tired", "exhausted", "give up"],
        reply: Reply::Fixed("I hear you. Rest is part of the journey, not the opposite of productivity. Take a break if you need it, but don't quit. Tomorrow is a new opportunity to show up stronger. 💪"),
    },
    Bucket {
        topic: Topic::Failure,
        keywords: &["fail", "mess"],
        reply: Reply::Fixed("Failure isn't the opposite of success—it's part of it. Every setback is a setup for a comeback. What matters is that you're still here, still trying. That takes courage."),
    },
    Bucket {
        topic: Topic::Habit,
        keywords: &["habit", "routine"],
        reply: Reply::Fixed("Great habits are built one day at a time. Start small—so small it feels almost too easy. Stack new habits onto existing ones. And most importantly, never miss twice in a row."),
    },
    Bucket {
        topic: Topic::Procrastination,
        keywords: &["procrastinat"],
        reply: Reply::Fixed("Procrastination often comes from feeling overwhelmed. Try the 2-minute rule: if a task takes less than 2 minutes, do it now. For bigger tasks, just commit to starting for 5 minutes. Action creates motivation!"),
    },
    Bucket {
        topic: Topic::Focus,
        keywords: &["focus", "distract"],
        reply: Reply::Fixed("Focus is a muscle—it gets stronger with practice. Try time-blocking your day, remove distractions, and work in focused sprints with breaks in between. Your environment shapes your behavior."),
    },
    Bucket {
        topic: Topic::Greeting,
        keywords: &["hello", "hi", "hey"],
        reply: Reply::Fixed("Hey there, champion! 🌟 I'm your FITOX Coach, here to help you crush your goals and build unstoppable habits. What's on your mind today?"),
    },
    Bucket {
        topic: Topic::Gratitude,
        keywords: &["thank"],
        reply: Reply::Fixed("You're very welcome! Remember, I'm always here to support your journey. Now go make today count! 🔥"),
    },
    Bucket {
        topic: Topic::Fitness,
        keywords: &["body", "muscle", "gym", "workout", "exercise", "fit"],
        reply: Reply::Fixed("💪 Building your body is all about consistency! Here's my advice:\n\n1. **Start with basics** - Push-ups, squats, planks daily\n2. **Progressive overload** - Increase reps/weight weekly\n3. **Protein intake** - Eat protein with every meal\n4. **Sleep 7-8 hours** - Muscles grow during rest\n5. **Stay hydrated** - 3-4 liters water daily\n\nAdd 'Workout' as a daily habit in your tasks. Small daily efforts = massive transformation! 🔥"),
    },
    Bucket {
        topic: Topic::Weight,
        keywords: &["weight", "fat", "slim", "diet"],
        reply: Reply::Fixed("🎯 Weight management is 80% nutrition, 20% exercise:\n\n1. **Calorie deficit** - Eat slightly less than you burn\n2. **Avoid processed foods** - Stick to whole foods\n3. **Walk 10k steps daily** - Simple but powerful\n4. **No sugary drinks** - Water, green tea, black coffee\n5. **Track your meals** - Awareness = control\n\nCreate a 'Healthy Eating' habit in your tasks. You've got this!"),
    },
    Bucket {
        topic: Topic::Study,
        keywords: &["study", "learn", "exam", "read", "book"],
        reply: Reply::Fixed("📚 Smart studying beats long studying:\n\n1. **Pomodoro Technique** - 25 min focus, 5 min break\n2. **Active recall** - Test yourself, don't just re-read\n3. **Teach others** - Best way to learn\n4. **Morning study** - Brain is freshest\n5. **Remove phone** - Out of sight, out of mind\n\nAdd a 'Study Session' task daily. Consistency > intensity!"),
    },
    Bucket {
        topic: Topic::Sleep,
        keywords: &["sleep", "wake", "morning", "early"],
        reply: Reply::Fixed("😴 Good sleep = Better performance:\n\n1. **Fixed schedule** - Same time daily, even weekends\n2. **No screens 1hr before bed** - Blue light kills sleep\n3. **Cool dark room** - Optimal for deep sleep\n4. **No caffeine after 2pm** - It stays in your system\n5. **Morning sunlight** - Resets your body clock\n\nMake 'Early Sleep' a tracked habit. Your energy will transform!"),
    },
    Bucket {
        topic: Topic::Stress,
        keywords: &["stress", "anxious", "worried", "mental", "depress"],
        reply: Reply::Fixed("🧘 Your mental health matters:\n\n1. **Deep breathing** - 4-7-8 technique calms instantly\n2. **Daily walk** - Nature heals the mind\n3. **Journal** - Write your thoughts out\n4. **Limit social media** - Compare less, live more\n5. **Talk to someone** - You're not alone\n\nAdd 'Mindfulness' to your daily habits. Small steps, big peace. ❤️"),
    },
    Bucket {
        topic: Topic::Productivity,
        keywords: &["productive", "work", "task", "time"],
        reply: Reply::Fixed("⚡ Productivity tips that actually work:\n\n1. **MIT First** - Do Most Important Task first\n2. **Time blocking** - Schedule everything\n3. **2-minute rule** - Quick tasks = do now\n4. **Batch similar tasks** - Less context switching\n5. **End-of-day review** - Plan tomorrow tonight\n\nUse FITOX to track your tasks. Small wins build momentum!"),
    },
    Bucket {
        topic: Topic::Goals,
        keywords: &["goal", "target", "achieve", "success"],
        reply: Reply::Fixed("🎯 Turn dreams into reality:\n\n1. **Be specific** - 'Lose 5kg' not 'lose weight'\n2. **Break it down** - Big goals → small daily tasks\n3. **Track progress** - What gets measured gets done\n4. **Celebrate wins** - Motivation fuel\n5. **Review weekly** - Adjust and keep going\n\nAdd your goals as tasks in FITOX. Let's make it happen! 🚀"),
    },
];

/// What to say when no topic matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// A random entry from [`COACH_RESPONSES`].
    #[default]
    Random,
    /// The fixed [`HELP_MENU`].
    Menu,
}

/// Maps an utterance to a coach reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct Responder {
    fallback: FallbackMode,
}

impl Responder {
    pub fn new(fallback: FallbackMode) -> Responder {
        Responder { fallback }
    }

    /// The first topic whose keywords appear in `utterance`, if any.
    pub fn match_bucket(&self, utterance: &str) -> Option<Topic> {
        find_bucket(&utterance.to_lowercase()).map(|b| b.topic)
    }

    pub fn reply<R: Rng + ?Sized>(&self, utterance: &str, rng: &mut R) -> String {
        let lower = utterance.to_lowercase();
        match find_bucket(&lower) {
            Some(bucket) => {
                debug!(topic = ?bucket.topic, "coach topic matched");
                match bucket.reply {
                    Reply::Fixed(text) => text.to_string(),
                    Reply::Quote => {
                        format!("{MOTIVATION_PREFIX}{}{MOTIVATION_SUFFIX}", random_quote(rng))
                    }
                }
            }
            None => {
                debug!(fallback = ?self.fallback, "no coach topic matched");
                match self.fallback {
                    FallbackMode::Random => pick(&COACH_RESPONSES, rng).to_string(),
                    FallbackMode::Menu => HELP_MENU.to_string(),
                }
            }
        }
    }
}

fn find_bucket(lower: &str) -> Option<&'static Bucket> {
    BUCKETS
        .iter()
        .find(|b| b.keywords.iter().any(|k| lower.contains(k)))
}

/// A uniformly chosen entry from [`QUOTES`].
pub fn random_quote<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(&QUOTES, rng)
}

fn pick<R: Rng + ?Sized>(items: &[&'static str], rng: &mut R) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn motivation_has_prefix_and_known_quote() {
        let responder = Responder::default();
        let mut rng = seeded_rng();
        for _ in 0..20 {
            let reply = responder.reply("I need some motivation", &mut rng);
            assert!(reply.starts_with(MOTIVATION_PREFIX));
            assert!(QUOTES.iter().any(|q| reply.contains(q)));
        }
    }

    #[test]
    fn greeting_is_deterministic() {
        let responder = Responder::default();
        let a = responder.reply("hello", &mut StdRng::seed_from_u64(1));
        let b = responder.reply("HELLO", &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
        assert!(a.starts_with("Hey there, champion!"));
    }

    #[test]
    fn unmatched_uses_default_set_reproducibly() {
        let responder = Responder::default();
        let first = responder.reply("xyzzy", &mut seeded_rng());
        let second = responder.reply("xyzzy", &mut seeded_rng());
        assert_eq!(first, second);
        assert!(COACH_RESPONSES.contains(&first.as_str()));
        assert_eq!(responder.match_bucket("xyzzy"), None);
    }

    #[test]
    fn unmatched_menu_mode() {
        let responder = Responder::new(FallbackMode::Menu);
        assert_eq!(responder.reply("xyzzy", &mut seeded_rng()), HELP_MENU);
    }

    #[test]
    fn earlier_topic_wins() {
        let responder = Responder::default();
        assert_eq!(
            responder.match_bucket("hello, I need motivation"),
            Some(Topic::Motivation)
        );
        let reply = responder.reply("hello, I need motivation", &mut seeded_rng());
        assert!(reply.starts_with(MOTIVATION_PREFIX));
        // greeting is declared before fitness
        assert_eq!(responder.match_bucket("hey, gym tips?"), Some(Topic::Greeting));
        // "habit" outranks "focus"
        assert_eq!(
            responder.match_bucket("focus on one habit"),
            Some(Topic::Habit)
        );
    }

    #[test]
    fn topic_order_is_fixed() {
        let order: Vec<Topic> = BUCKETS.iter().map(|b| b.topic).collect();
        assert_eq!(
            order,
            vec![
                Topic::Motivation,
                Topic::Fatigue,
                Topic::Failure,
                Topic::Habit,
                Topic::Procrastination,
                Topic::Focus,
                Topic::Greeting,
                Topic::Gratitude,
                Topic::Fitness,
                Topic::Weight,
                Topic::Study,
                Topic::Sleep,
                Topic::Stress,
                Topic::Productivity,
                Topic::Goals,
            ]
        );
    }

    #[test]
    fn substring_matching_is_literal() {
        let responder = Responder::default();
        // "this" contains "hi"
        assert_eq!(responder.match_bucket("is this ok"), Some(Topic::Greeting));
        assert_eq!(responder.match_bucket("I can't sleep"), Some(Topic::Sleep));
        assert_eq!(responder.match_bucket("exam stress"), Some(Topic::Study));
        assert_eq!(responder.match_bucket("I'm worried"), Some(Topic::Stress));
        assert_eq!(responder.match_bucket("set a target"), Some(Topic::Goals));
    }

    #[test]
    fn every_topic_has_its_reply() {
        let responder = Responder::default();
        let cases = [
            ("I need motivation", Topic::Motivation, MOTIVATION_PREFIX),
            ("I'm so tired", Topic::Fatigue, "I hear you."),
            ("I failed again", Topic::Failure, "Failure isn't"),
            ("my routine", Topic::Habit, "Great habits"),
            ("I keep procrastinating", Topic::Procrastination, "Procrastination often"),
            ("can't focus", Topic::Focus, "Focus is a muscle"),
            ("hello", Topic::Greeting, "Hey there, champion!"),
            ("thanks", Topic::Gratitude, "You're very welcome!"),
            ("gym plan", Topic::Fitness, "💪 Building your body"),
            ("lose weight", Topic::Weight, "🎯 Weight management"),
            ("exam soon", Topic::Study, "📚 Smart studying"),
            ("can't sleep", Topic::Sleep, "😴 Good sleep"),
            ("anxious", Topic::Stress, "🧘 Your mental health"),
            ("be productive", Topic::Productivity, "⚡ Productivity tips"),
            ("my goal", Topic::Goals, "🎯 Turn dreams"),
        ];
        assert_eq!(cases.len(), BUCKETS.len());
        for (utterance, topic, prefix) in cases {
            assert_eq!(responder.match_bucket(utterance), Some(topic), "{utterance}");
            let reply = responder.reply(utterance, &mut seeded_rng());
            assert!(reply.starts_with(prefix), "{utterance}: {reply}");
        }
    }

    #[test]
    fn random_quote_is_from_list() {
        let mut rng = seeded_rng();
        assert!(QUOTES.contains(&random_quote(&mut rng)));
    }
}
