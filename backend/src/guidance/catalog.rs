//! Category Knowledge Tables
//!
//! Fixed mapping from a predicted career category to a motivational
//! message, suggested degrees and suggested careers.

/// A (name, icon) suggestion shown to the student
pub type Suggestion = (&'static str, &'static str);

/// Static guidance attached to one category
#[derive(Debug, Clone, Copy)]
pub struct CategoryProfile {
    pub label: &'static str,
    pub message: &'static str,
    pub degrees: &'static [Suggestion],
    pub careers: &'static [Suggestion],
}

pub static CATEGORY_PROFILES: [CategoryProfile; 4] = [
    CategoryProfile {
        label: "Science",
        message: "🔬 Explore, experiment, and innovate!",
        degrees: &[
            ("B.Tech in CS", "💻"),
            ("B.Sc Physics", "⚛️"),
            ("MBBS", "🩺"),
            ("BCA", "🖥"),
        ],
        careers: &[
            ("Software Engineer", "💻"),
            ("Research Scientist", "🔬"),
            ("Doctor", "🩺"),
            ("Data Scientist", "📊"),
        ],
    },
    CategoryProfile {
        label: "Commerce",
        message: "💰 Learn financial thinking and business basics.",
        degrees: &[
            ("B.Com Hons", "📚"),
            ("CA", "🧾"),
            ("BBA Finance", "💹"),
            ("BA Economics", "💵"),
        ],
        careers: &[
            ("Accountant", "📒"),
            ("Investment Banker", "💰"),
            ("Entrepreneur", "🚀"),
            ("Financial Analyst", "📈"),
        ],
    },
    CategoryProfile {
        label: "Arts",
        message: "🎨 Grow your creative and communication skills.",
        degrees: &[
            ("BA Psychology", "🧠"),
            ("BFA", "🎨"),
            ("BA Journalism", "📰"),
            ("BA English Lit", "📖"),
        ],
        careers: &[
            ("Psychologist", "🧠"),
            ("Graphic Designer", "🎨"),
            ("Journalist", "📰"),
            ("Content Writer", "✍️"),
        ],
    },
    CategoryProfile {
        label: "Vocational",
        message: "🔧 Develop hands-on and employable skills.",
        degrees: &[
            ("Diploma Web Designing", "💻"),
            ("ITI (Electrical)", "⚡"),
            ("B.Voc Hospitality", "🏨"),
            ("Skill Plumbing", "🔧"),
        ],
        careers: &[
            ("Full-Stack Dev", "💻"),
            ("Electrician", "⚡"),
            ("Hotel Manager", "🏨"),
            ("Mechanic", "🔧"),
        ],
    },
];

/// Look up the profile for a category label (exact match)
pub fn profile_for(label: &str) -> Option<&'static CategoryProfile> {
    CATEGORY_PROFILES.iter().find(|p| p.label == label)
}

pub fn message_for(label: &str) -> &'static str {
    profile_for(label).map(|p| p.message).unwrap_or("")
}

pub fn degrees_for(label: &str) -> &'static [Suggestion] {
    profile_for(label).map(|p| p.degrees).unwrap_or(&[])
}

pub fn careers_for(label: &str) -> &'static [Suggestion] {
    profile_for(label).map(|p| p.careers).unwrap_or(&[])
}
