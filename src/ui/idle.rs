/// Frame-counted idle animation: a typewriter welcome, then a blinking prompt.
#[derive(Debug, Clone)]
pub struct IdleScreen {
    welcome: String,
    /// Characters of `welcome` revealed so far.
    letters: usize,
    frame: u64,
    blink_on: bool,
}

impl IdleScreen {
    pub const PROMPT: &'static str = "Insert Cartridge";
    pub const FRAMES_PER_LETTER: u64 = 2;
    pub const BLINK_FRAMES: u64 = 15;

    pub fn new(greeting: &str) -> Self {
        Self {
            welcome: format!("Welcome {greeting}"),
            letters: 0,
            frame: 0,
            blink_on: true,
        }
    }

    /// Move the animation forward by one frame.
    pub fn advance(&mut self) {
        self.frame += 1;
        if !self.is_typed() && self.frame % Self::FRAMES_PER_LETTER == 0 {
            self.letters += 1;
        }
        if self.frame % Self::BLINK_FRAMES == 0 {
            self.blink_on = !self.blink_on;
        }
    }

    /// The part of the welcome line revealed so far.
    pub fn typed(&self) -> &str {
        match self.welcome.char_indices().nth(self.letters) {
            Some((end, _)) => &self.welcome[..end],
            None => &self.welcome,
        }
    }

    pub fn is_typed(&self) -> bool {
        self.letters >= self.welcome.chars().count()
    }

    /// The prompt only blinks once the welcome line is complete.
    pub fn prompt_visible(&self) -> bool {
        self.is_typed() && self.blink_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_one_letter_every_two_frames() {
        let mut idle = IdleScreen::new("Ana");
        assert_eq!(idle.typed(), "");
        idle.advance();
        assert_eq!(idle.typed(), "");
        idle.advance();
        assert_eq!(idle.typed(), "W");
        for _ in 0..4 {
            idle.advance();
        }
        assert_eq!(idle.typed(), "Wel");
    }

    #[test]
    fn prompt_waits_for_the_full_welcome() {
        let mut idle = IdleScreen::new("Ana");
        // "Welcome Ana" is 11 characters.
        for _ in 0..21 {
            idle.advance();
            assert!(!idle.prompt_visible());
        }
        idle.advance();
        assert_eq!(idle.typed(), "Welcome Ana");
        assert!(idle.is_typed());
    }

    #[test]
    fn prompt_blinks_every_fifteen_frames() {
        let mut idle = IdleScreen::new("");
        // Frame 16: "Welcome " is typed, blink toggled once at frame 15.
        let mut seen = Vec::new();
        for _ in 0..60 {
            idle.advance();
            seen.push(idle.prompt_visible());
        }
        assert!(!seen[15]); // frame 16
        assert!(seen[29]); // frame 30
        assert!(seen[43]); // frame 44
        assert!(!seen[44]); // frame 45
    }

    #[test]
    fn multibyte_greetings_are_cut_on_char_boundaries() {
        let mut idle = IdleScreen::new("Zoë");
        for _ in 0..20 {
            idle.advance();
        }
        assert_eq!(idle.typed(), "Welcome Zo");
        idle.advance();
        idle.advance();
        assert_eq!(idle.typed(), "Welcome Zoë");
    }
}
