//! The nine story-shaping preferences.
//!
//! Each field is a small closed vocabulary picked from a combo box; any
//! combination is legal and no cross-field validation exists. The display
//! labels double as the values substituted into the generation prompt, so
//! they are written out in full prose form.

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    North,
    South,
    East,
    West,
    Central,
}

pub const ALL_REGIONS: [Region; 5] = [
    Region::North,
    Region::South,
    Region::East,
    Region::West,
    Region::Central,
];

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::North => "North India",
            Region::South => "South India",
            Region::East => "East India",
            Region::West => "West India",
            Region::Central => "Central India",
        }
    }
}

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Genre {
    #[default]
    Mythology,
    HistoricalFiction,
    BollywoodDrama,
    Folklore,
}

pub const ALL_GENRES: [Genre; 4] = [
    Genre::Mythology,
    Genre::HistoricalFiction,
    Genre::BollywoodDrama,
    Genre::Folklore,
];

impl Genre {
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Mythology => "Mythology",
            Genre::HistoricalFiction => "Historical Fiction",
            Genre::BollywoodDrama => "Bollywood-inspired Drama",
            Genre::Folklore => "Folklore",
        }
    }
}

// ---------------------------------------------------------------------------
// Setting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Setting {
    #[default]
    AncientIndia,
    ModernCity,
    VillageLife,
    FreedomStruggle,
}

pub const ALL_SETTINGS: [Setting; 4] = [
    Setting::AncientIndia,
    Setting::ModernCity,
    Setting::VillageLife,
    Setting::FreedomStruggle,
];

impl Setting {
    pub fn label(&self) -> &'static str {
        match self {
            Setting::AncientIndia => "Ancient India",
            Setting::ModernCity => "Modern-day City",
            Setting::VillageLife => "Village Life",
            Setting::FreedomStruggle => "Freedom Struggle Era",
        }
    }
}

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plot {
    #[default]
    OvercomingObstacles,
    FamilySaga,
    LoveStory,
    FriendshipAndLoyalty,
}

pub const ALL_PLOTS: [Plot; 4] = [
    Plot::OvercomingObstacles,
    Plot::FamilySaga,
    Plot::LoveStory,
    Plot::FriendshipAndLoyalty,
];

impl Plot {
    pub fn label(&self) -> &'static str {
        match self {
            Plot::OvercomingObstacles => "Overcoming obstacles",
            Plot::FamilySaga => "Family saga",
            Plot::LoveStory => "Love story",
            Plot::FriendshipAndLoyalty => "Friendship and loyalty",
        }
    }
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Emotional,
    Inspirational,
    Humorous,
    Mysterious,
}

pub const ALL_TONES: [Tone; 4] = [
    Tone::Emotional,
    Tone::Inspirational,
    Tone::Humorous,
    Tone::Mysterious,
];

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Emotional => "Emotional",
            Tone::Inspirational => "Inspirational",
            Tone::Humorous => "Humorous",
            Tone::Mysterious => "Mysterious",
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Karma,
    UnityInDiversity,
    TraditionVsModernity,
    Hope,
}

pub const ALL_THEMES: [Theme; 4] = [
    Theme::Karma,
    Theme::UnityInDiversity,
    Theme::TraditionVsModernity,
    Theme::Hope,
];

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Karma => "Karma",
            Theme::UnityInDiversity => "Unity in Diversity",
            Theme::TraditionVsModernity => "Tradition vs. Modernity",
            Theme::Hope => "Hope",
        }
    }
}

// ---------------------------------------------------------------------------
// Conflict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conflict {
    #[default]
    ClassStruggles,
    MoralDilemma,
    ManVsNature,
    GenerationalConflict,
}

pub const ALL_CONFLICTS: [Conflict; 4] = [
    Conflict::ClassStruggles,
    Conflict::MoralDilemma,
    Conflict::ManVsNature,
    Conflict::GenerationalConflict,
];

impl Conflict {
    pub fn label(&self) -> &'static str {
        match self {
            Conflict::ClassStruggles => "Class struggles",
            Conflict::MoralDilemma => "Internal moral dilemma",
            Conflict::ManVsNature => "Man vs. Nature",
            Conflict::GenerationalConflict => "Generational conflict",
        }
    }
}

// ---------------------------------------------------------------------------
// Twist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Twist {
    #[default]
    Reincarnation,
    HiddenLineage,
    UnexpectedSacrifice,
    SpiritualRevelation,
}

pub const ALL_TWISTS: [Twist; 4] = [
    Twist::Reincarnation,
    Twist::HiddenLineage,
    Twist::UnexpectedSacrifice,
    Twist::SpiritualRevelation,
];

impl Twist {
    pub fn label(&self) -> &'static str {
        match self {
            Twist::Reincarnation => "Reincarnation",
            Twist::HiddenLineage => "Hidden lineage",
            Twist::UnexpectedSacrifice => "Unexpected sacrifice",
            Twist::SpiritualRevelation => "Spiritual revelation",
        }
    }
}

// ---------------------------------------------------------------------------
// Ending
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ending {
    #[default]
    Happy,
    Bittersweet,
    OpenEnded,
    Tragic,
}

pub const ALL_ENDINGS: [Ending; 4] = [
    Ending::Happy,
    Ending::Bittersweet,
    Ending::OpenEnded,
    Ending::Tragic,
];

impl Ending {
    pub fn label(&self) -> &'static str {
        match self {
            Ending::Happy => "Happy",
            Ending::Bittersweet => "Bittersweet",
            Ending::OpenEnded => "Open-ended",
            Ending::Tragic => "Tragic",
        }
    }
}

// ---------------------------------------------------------------------------
// PreferenceSet
// ---------------------------------------------------------------------------

/// The full set of nine choices carried by one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferenceSet {
    pub region: Region,
    pub genre: Genre,
    pub setting: Setting,
    pub plot: Plot,
    pub tone: Tone,
    pub theme: Theme,
    pub conflict: Conflict,
    pub twist: Twist,
    pub ending: Ending,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_uses_first_option_of_each_field() {
        let prefs = PreferenceSet::default();
        assert_eq!(prefs.region, Region::North);
        assert_eq!(prefs.genre, Genre::Mythology);
        assert_eq!(prefs.setting, Setting::AncientIndia);
        assert_eq!(prefs.plot, Plot::OvercomingObstacles);
        assert_eq!(prefs.tone, Tone::Emotional);
        assert_eq!(prefs.theme, Theme::Karma);
        assert_eq!(prefs.conflict, Conflict::ClassStruggles);
        assert_eq!(prefs.twist, Twist::Reincarnation);
        assert_eq!(prefs.ending, Ending::Happy);
    }

    #[test]
    fn labels_are_distinct_within_each_field() {
        fn assert_distinct(labels: &[&str]) {
            for (i, a) in labels.iter().enumerate() {
                for b in &labels[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }

        assert_distinct(&ALL_REGIONS.map(|v| v.label()));
        assert_distinct(&ALL_GENRES.map(|v| v.label()));
        assert_distinct(&ALL_SETTINGS.map(|v| v.label()));
        assert_distinct(&ALL_PLOTS.map(|v| v.label()));
        assert_distinct(&ALL_TONES.map(|v| v.label()));
        assert_distinct(&ALL_THEMES.map(|v| v.label()));
        assert_distinct(&ALL_CONFLICTS.map(|v| v.label()));
        assert_distinct(&ALL_TWISTS.map(|v| v.label()));
        assert_distinct(&ALL_ENDINGS.map(|v| v.label()));
    }

    #[test]
    fn any_combination_is_constructible() {
        // No cross-field validation: an arbitrary mix must simply build.
        let prefs = PreferenceSet {
            region: Region::East,
            genre: Genre::Folklore,
            setting: Setting::VillageLife,
            plot: Plot::FriendshipAndLoyalty,
            tone: Tone::Humorous,
            theme: Theme::Hope,
            conflict: Conflict::ManVsNature,
            twist: Twist::HiddenLineage,
            ending: Ending::Happy,
        };
        assert_eq!(prefs.genre.label(), "Folklore");
        assert_eq!(prefs.conflict.label(), "Man vs. Nature");
    }
}
