use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Nova,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Nova => "Nova X",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub speaker: Speaker,
    pub text: String,
}

/// The visible conversation log, plus a generation counter that lets the
/// dispatcher discard replies that arrive after a newer send started.
/// Responses are appended in arrival order only while their generation is
/// still current; a stale reply is dropped instead of inverting the display.
#[derive(Default)]
pub struct Transcript {
    bubbles: Vec<Bubble>,
    generation: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bubble unconditionally (user echoes, status notes).
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.bubbles.push(Bubble {
            speaker,
            text: text.into(),
        });
    }

    /// Start a new turn; any reply tagged with an older generation is stale.
    pub fn begin_turn(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Append a reply only if `generation` is still the latest turn.
    /// Returns whether the bubble was kept.
    pub fn try_complete(&mut self, generation: u64, speaker: Speaker, text: impl Into<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.push(speaker, text);
        true
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Render one bubble for the terminal, preserving literal newlines as
    /// indented continuation lines.
    pub fn render(bubble: &Bubble) -> String {
        let label = match bubble.speaker {
            Speaker::You => style(bubble.speaker.label()).green().bold(),
            Speaker::Nova => style(bubble.speaker.label()).cyan().bold(),
        };
        let indented = bubble.text.replace('\n', "\n    ");
        format!("{label}: {indented}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut t = Transcript::new();
        t.push(Speaker::You, "hi");
        t.push(Speaker::Nova, "hello");
        assert_eq!(t.len(), 2);
        assert_eq!(t.bubbles()[0].speaker, Speaker::You);
    }

    #[test]
    fn current_generation_reply_is_kept() {
        let mut t = Transcript::new();
        let generation = t.begin_turn();
        assert!(t.try_complete(generation, Speaker::Nova, "reply"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn stale_generation_reply_is_discarded() {
        let mut t = Transcript::new();
        let first = t.begin_turn();
        let _second = t.begin_turn();

        // Reply to the first send arrives after the second send started.
        assert!(!t.try_complete(first, Speaker::Nova, "late reply"));
        assert!(t.is_empty());
    }

    #[test]
    fn latest_generation_wins_under_skew() {
        let mut t = Transcript::new();
        let first = t.begin_turn();
        let second = t.begin_turn();

        assert!(t.try_complete(second, Speaker::Nova, "second reply"));
        assert!(!t.try_complete(first, Speaker::Nova, "first reply"));

        assert_eq!(t.len(), 1);
        assert_eq!(t.bubbles()[0].text, "second reply");
    }

    #[test]
    fn render_preserves_newlines_as_indentation() {
        let bubble = Bubble {
            speaker: Speaker::Nova,
            text: "line one\nline two".into(),
        };
        let rendered = Transcript::render(&bubble);
        assert!(rendered.contains("line one\n    line two"));
    }
}
