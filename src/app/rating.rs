use ratatui::layout::Rect;

pub const DEFAULT_MAX_RATING: u8 = 5;

/// Terminal columns taken by one star ("★ ").
pub const STAR_WIDTH: u16 = 2;

/// State behind the star rating control.
///
/// The committed rating only changes through [`StarRating::rate`]. Hover is
/// presentational and is dropped by [`StarRating::leave`].
#[derive(Debug, Clone, PartialEq)]
pub struct StarRating {
    max: u8,
    rating: u8,
    hover: u8,
    messages: Vec<String>,
}

impl Default for StarRating {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RATING)
    }
}

impl StarRating {
    pub fn new(max: u8) -> Self {
        Self {
            max: max.max(1),
            rating: 0,
            hover: 0,
            messages: Vec::new(),
        }
    }

    /// Starts the control at an externally supplied value.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating.min(self.max);
        self
    }

    /// Labels shown in place of the number, one per star.
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn is_hovering(&self) -> bool {
        self.hover > 0
    }

    pub fn hover(&mut self, star: u8) {
        self.hover = star.clamp(1, self.max);
    }

    pub fn leave(&mut self) {
        self.hover = 0;
    }

    /// Commits `star` and returns the value the owner should capture.
    pub fn rate(&mut self, star: u8) -> u8 {
        self.rating = star.clamp(1, self.max);
        self.rating
    }

    /// Commits whatever is currently shown.
    pub fn rate_displayed(&mut self) -> Option<u8> {
        match self.displayed() {
            0 => None,
            star => Some(self.rate(star)),
        }
    }

    pub fn hover_next(&mut self) {
        let next = self.displayed().saturating_add(1);
        self.hover(next);
    }

    pub fn hover_previous(&mut self) {
        let previous = self.displayed().saturating_sub(1);
        self.hover(previous);
    }

    pub fn displayed(&self) -> u8 {
        if self.hover > 0 { self.hover } else { self.rating }
    }

    pub fn label(&self) -> String {
        match self.displayed() {
            0 => String::new(),
            n if self.messages.len() == self.max as usize => {
                self.messages[n as usize - 1].clone()
            }
            n => n.to_string(),
        }
    }

    /// Maps a terminal column inside `area` to a star position.
    pub fn position_at(&self, area: Rect, column: u16, row: u16) -> Option<u8> {
        if row < area.y || row >= area.y.saturating_add(area.height) {
            return None;
        }
        if column < area.x || column >= area.x.saturating_add(area.width) {
            return None;
        }

        let star = (column - area.x) / STAR_WIDTH + 1;
        if star <= self.max as u16 {
            Some(star as u8)
        } else {
            None
        }
    }
}
