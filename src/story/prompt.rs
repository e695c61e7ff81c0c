//! Prompt construction for story generation.
//!
//! Two layers:
//! * [`build_scene_prompt`] — substitutes the image caption and all nine
//!   preference values into a fixed template. Same inputs always yield the
//!   same string; the orchestrator composes this once per run.
//! * [`PromptBuilder::build_chat`] — wraps a scene prompt into the
//!   `(system_msg, user_msg)` pair sent to the chat-completion endpoint,
//!   including the word cap the model is asked to honour.

use crate::prefs::PreferenceSet;

// ---------------------------------------------------------------------------
// Scene prompt
// ---------------------------------------------------------------------------

/// Compose the deterministic scene prompt from a caption and preferences.
///
/// Every one of the nine preference labels appears in the output, along
/// with the caption itself.
///
/// # Example
/// ```rust
/// use katha::prefs::PreferenceSet;
/// use katha::story::build_scene_prompt;
///
/// let prompt = build_scene_prompt("a dog running on a beach", &PreferenceSet::default());
/// assert!(prompt.contains("a dog running on a beach"));
/// assert!(prompt.contains("Mythology"));
/// ```
pub fn build_scene_prompt(caption: &str, prefs: &PreferenceSet) -> String {
    format!(
        "Based on the image description: '{caption}', create a {genre} story \
         set in {setting} in {region}. The story should follow a plot of \
         {plot} and have a {tone} tone, exploring the theme of {theme}. The \
         main conflict should be {conflict}. The story should have a {twist} \
         and end with a {ending} ending.",
        caption = caption,
        genre = prefs.genre.label(),
        setting = prefs.setting.label(),
        region = prefs.region.label(),
        plot = prefs.plot.label(),
        tone = prefs.tone.label(),
        theme = prefs.theme.label(),
        conflict = prefs.conflict.label(),
        twist = prefs.twist.label(),
        ending = prefs.ending.label(),
    )
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the chat-message pair for the generation endpoint.
///
/// The word cap appears in both the system instruction and the user
/// message; the model enforces it — the client never truncates locally.
pub struct PromptBuilder {
    max_words: u32,
}

impl PromptBuilder {
    /// Create a builder with the configured word cap.
    pub fn new(max_words: u32) -> Self {
        Self { max_words }
    }

    /// Build the `(system_msg, user_msg)` pair for a composed scene prompt.
    pub fn build_chat(&self, scene_prompt: &str) -> (String, String) {
        let system_msg = format!(
            "As an experienced short story writer, write a meaningful story \
             influenced by the provided prompt. Ensure the story does not \
             exceed {} words.",
            self.max_words
        );

        let user_msg = format!(
            "Write a short story of no more than {} words based on the \
             following prompt: {}",
            self.max_words, scene_prompt
        );

        (system_msg, user_msg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{
        Conflict, Ending, Genre, Plot, PreferenceSet, Region, Setting, Theme, Tone, Twist,
    };

    fn beach_prefs() -> PreferenceSet {
        PreferenceSet {
            region: Region::East,
            genre: Genre::Folklore,
            setting: Setting::VillageLife,
            plot: Plot::FriendshipAndLoyalty,
            tone: Tone::Humorous,
            theme: Theme::Hope,
            conflict: Conflict::ManVsNature,
            twist: Twist::HiddenLineage,
            ending: Ending::Happy,
        }
    }

    /// Same inputs must yield byte-identical prompts.
    #[test]
    fn scene_prompt_is_deterministic() {
        let caption = "a dog running on a beach";
        let prefs = beach_prefs();
        let a = build_scene_prompt(caption, &prefs);
        let b = build_scene_prompt(caption, &prefs);
        assert_eq!(a, b);
    }

    /// The prompt must embed the caption and all nine preference values.
    #[test]
    fn scene_prompt_embeds_caption_and_all_nine_values() {
        let caption = "a dog running on a beach";
        let prefs = beach_prefs();
        let prompt = build_scene_prompt(caption, &prefs);

        assert!(prompt.contains(caption));
        assert!(prompt.contains("East India"));
        assert!(prompt.contains("Folklore"));
        assert!(prompt.contains("Village Life"));
        assert!(prompt.contains("Friendship and loyalty"));
        assert!(prompt.contains("Humorous"));
        assert!(prompt.contains("Hope"));
        assert!(prompt.contains("Man vs. Nature"));
        assert!(prompt.contains("Hidden lineage"));
        assert!(prompt.contains("Happy"));
    }

    /// Different preferences must change the prompt.
    #[test]
    fn scene_prompt_varies_with_preferences() {
        let caption = "a temple at sunrise";
        let a = build_scene_prompt(caption, &PreferenceSet::default());
        let b = build_scene_prompt(caption, &beach_prefs());
        assert_ne!(a, b);
    }

    #[test]
    fn chat_pair_carries_word_cap_and_scene() {
        let builder = PromptBuilder::new(250);
        let (system, user) = builder.build_chat("the scene");

        assert!(system.contains("250 words"));
        assert!(system.contains("short story writer"));
        assert!(user.contains("250 words"));
        assert!(user.contains("the scene"));
    }

    #[test]
    fn chat_pair_tracks_configured_cap() {
        let builder = PromptBuilder::new(100);
        let (system, user) = builder.build_chat("x");
        assert!(system.contains("100 words"));
        assert!(user.contains("100 words"));
    }
}
