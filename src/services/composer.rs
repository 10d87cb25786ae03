// src/services/composer.rs

//! Notification composer.
//!
//! Renders one catalog entry into a [`NotificationMessage`]. Phrasing and
//! decoration are drawn from fixed pools through a [`PhraseSource`], so the
//! same entry can be announced in different words while tests replay exact
//! choices.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{CatalogEntry, Embed, EmbedField, LinkConfig, NotificationMessage, Repository};
use crate::utils::title_case;

/// Decorative emojis placed on both sides of the headline.
pub const EMOJIS: &[&str] = &[
    "🎉", "🍾", "🎊", "🎇", "🥂", "🎈", "🥳", "🎆", "🧨", "🤯", "💥", "🔥", "🎮", "🕹️", "👾", "✨",
    "🌟", "🤩", "🚀", "🎁",
];

/// Headline templates; `{title}` is replaced by the entry title.
pub const ANNOUNCEMENT_TEMPLATES: &[&str] = &[
    "A new port has arrived! **{title}** is now available on PortMaster!",
    "Check out the latest addition! **{title}** just landed on PortMaster!",
    "Fresh off the press! You can now grab **{title}** on PortMaster!",
    "Get ready to play! **{title}** has just been released on PortMaster!",
    "Heads up, everyone! **{title}** is the newest port available!",
    "Surprise! **{title}** has just dropped on PortMaster!",
    "Hold onto your hats! **{title}** is now playable on PortMaster!",
    "The port collection grows! Welcome, **{title}**!",
    "It's here! **{title}** has officially joined the PortMaster library.",
    "New game alert! **{title}** has been added to PortMaster.",
    "Power up your devices! **{title}** is ready for download on PortMaster.",
];

/// Credit templates; `{porters}` is replaced by the bolded porter list.
pub const THANKS_TEMPLATES: &[&str] = &[
    "Thanks to {porters} for bringing this game to PortMaster!",
    "A big thank you to {porters} for their work on this port!",
    "Shout-out to {porters} for making this release possible!",
    "This port was made possible by the talented {porters}!",
    "Let's give a round of applause to {porters} for this one!",
    "Huge props to {porters} for porting this over!",
];

/// Value shown for an entry without genres.
pub const NO_GENRES: &str = "N/A";

/// Source of the cosmetic choices made while composing.
pub trait PhraseSource: Send {
    /// Pick an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random choices.
pub struct RandomPhrases {
    rng: StdRng,
}

impl RandomPhrases {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPhrases {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseSource for RandomPhrases {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices (each taken modulo the pool size), then
/// keeps returning zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPhrases {
    picks: VecDeque<usize>,
}

impl ScriptedPhrases {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl PhraseSource for ScriptedPhrases {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}

/// Turns catalog entries into announcement messages.
pub struct Composer {
    links: LinkConfig,
    phrases: Box<dyn PhraseSource>,
}

impl Composer {
    pub fn new(links: LinkConfig, phrases: Box<dyn PhraseSource>) -> Self {
        Self { links, phrases }
    }

    /// Composer drawing from [`RandomPhrases`].
    pub fn random(links: LinkConfig) -> Self {
        Self::new(links, Box::new(RandomPhrases::new()))
    }

    fn choose(&mut self, pool: &[&'static str]) -> &'static str {
        pool[self.phrases.pick(pool.len()) % pool.len()]
    }

    /// Compose the announcement for one entry.
    ///
    /// Draws, in order: headline template, left emoji, right emoji, credits
    /// template.
    pub fn compose(&mut self, entry: &CatalogEntry) -> NotificationMessage {
        let headline = self
            .choose(ANNOUNCEMENT_TEMPLATES)
            .replace("{title}", &entry.title);
        let left = self.choose(EMOJIS);
        let right = self.choose(EMOJIS);

        let porters_md = entry
            .porters
            .iter()
            .map(|p| format!("**{p}**"))
            .collect::<Vec<_>>()
            .join(", ");
        let thanks = self
            .choose(THANKS_TEMPLATES)
            .replace("{porters}", &porters_md);

        NotificationMessage {
            key: entry.key.clone(),
            content: format!("{left} {headline} {right}"),
            embed: Embed {
                title: entry.title.clone(),
                url: self.detail_url(entry),
                description: format!("{}\n\n{}", entry.description, thanks),
                image_url: self.image_url(entry),
                fields: Self::fields(entry),
            },
        }
    }

    /// Screenshot URL, or None when the entry has no screenshot.
    pub fn image_url(&self, entry: &CatalogEntry) -> Option<String> {
        let screenshot = entry.screenshot.as_deref()?;
        let base = match entry.repository {
            Repository::Main => &self.links.screenshot_base_main,
            Repository::Multiverse => &self.links.screenshot_base_multiverse,
        };
        Some(format!("{}{}/{}", base, entry.slug(), screenshot))
    }

    pub fn detail_url(&self, entry: &CatalogEntry) -> String {
        format!("{}{}", self.links.detail_base, entry.slug())
    }

    fn fields(entry: &CatalogEntry) -> Vec<EmbedField> {
        let genres = if entry.genres.is_empty() {
            NO_GENRES.to_string()
        } else {
            entry
                .genres
                .iter()
                .map(|g| title_case(g))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let ready = if entry.ready_to_run { "✅ Yes" } else { "❌ No" };

        let mut fields = vec![
            EmbedField::new("Porters", entry.porters.join(", "), false),
            EmbedField::new("Genres", genres, true),
            EmbedField::new("Ready to Run", ready, true),
        ];
        if let Some(notes) = &entry.install_notes {
            fields.push(EmbedField::new("Notes", notes.clone(), false));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            key: "zelda.zip".to_string(),
            title: "Zelda Classic".to_string(),
            description: "A fan engine.".to_string(),
            porters: vec!["alice".to_string(), "bob".to_string()],
            genres: vec!["adventure".to_string(), "action rpg".to_string()],
            ready_to_run: true,
            install_notes: Some("Copy your data files.".to_string()),
            screenshot: Some("screenshot.png".to_string()),
            repository: Repository::Main,
        }
    }

    fn composer(picks: Vec<usize>) -> Composer {
        Composer::new(LinkConfig::default(), Box::new(ScriptedPhrases::new(picks)))
    }

    #[test]
    fn test_compose_exact_message() {
        let message = composer(vec![5, 0, 11, 3]).compose(&entry());

        assert_eq!(message.key, "zelda.zip");
        assert_eq!(
            message.content,
            "🎉 Surprise! **Zelda Classic** has just dropped on PortMaster! 🔥"
        );
        assert_eq!(message.embed.title, "Zelda Classic");
        assert_eq!(
            message.embed.url,
            "https://portmaster.games/detail.html?name=zelda"
        );
        assert_eq!(
            message.embed.description,
            "A fan engine.\n\nThis port was made possible by the talented **alice**, **bob**!"
        );
        assert_eq!(
            message.embed.image_url.as_deref(),
            Some("https://raw.githubusercontent.com/PortsMaster/PortMaster-New/main/ports/zelda/screenshot.png")
        );
    }

    #[test]
    fn test_fields() {
        let message = composer(vec![]).compose(&entry());
        let fields = &message.embed.fields;

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], EmbedField::new("Porters", "alice, bob", false));
        assert_eq!(fields[1], EmbedField::new("Genres", "Adventure, Action Rpg", true));
        assert_eq!(fields[2], EmbedField::new("Ready to Run", "✅ Yes", true));
        assert_eq!(fields[3], EmbedField::new("Notes", "Copy your data files.", false));
    }

    #[test]
    fn test_fields_without_optional_data() {
        let bare = CatalogEntry::new("bare.zip", "Bare");
        let message = composer(vec![]).compose(&bare);
        let fields = &message.embed.fields;

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].value, "N/A");
        assert_eq!(fields[1].value, NO_GENRES);
        assert_eq!(fields[2].value, "❌ No");
        assert!(message.embed.image_url.is_none());
    }

    #[test]
    fn test_multiverse_uses_alternate_base() {
        let mut mv = entry();
        mv.repository = Repository::Multiverse;
        let message = composer(vec![]).compose(&mv);

        assert_eq!(
            message.embed.image_url.as_deref(),
            Some("https://raw.githubusercontent.com/PortsMaster-MV/PortMaster-MV-New/main/ports/zelda/screenshot.png")
        );
    }

    #[test]
    fn test_random_phrases_stay_in_pools() {
        let mut composer = Composer::new(LinkConfig::default(), Box::new(RandomPhrases::seeded(7)));

        for _ in 0..50 {
            let message = composer.compose(&entry());
            let inner = ANNOUNCEMENT_TEMPLATES
                .iter()
                .map(|t| t.replace("{title}", "Zelda Classic"))
                .any(|h| message.content.contains(&h));
            assert!(inner);
            assert!(EMOJIS.iter().any(|e| message.content.starts_with(e)));
            assert!(EMOJIS.iter().any(|e| message.content.ends_with(e)));
        }
    }

    struct OutOfRange;

    impl PhraseSource for OutOfRange {
        fn pick(&mut self, len: usize) -> usize {
            len + 3
        }
    }

    #[test]
    fn test_out_of_range_pick_wraps() {
        let mut composer = Composer::new(LinkConfig::default(), Box::new(OutOfRange));
        let message = composer.compose(&entry());

        // 11 templates: 14 % 11 == 3
        assert!(message.content.contains("Get ready to play! **Zelda Classic**"));
        // 20 emojis: 23 % 20 == 3
        assert!(message.content.starts_with("🎇"));
    }

    #[test]
    fn test_scripted_phrases_wrap_and_default() {
        let mut phrases = ScriptedPhrases::new(vec![25]);
        assert_eq!(phrases.pick(20), 5);
        assert_eq!(phrases.pick(20), 0);
    }
}
