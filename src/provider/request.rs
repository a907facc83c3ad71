use crate::assets::color::Color;
use crate::foundation::error::{StoryError, StoryResult};

/// Theme used when the request names none.
pub const DEFAULT_THEME: &str = "abstract background";

/// What the story is meant to achieve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryGoal {
    /// Relatable, emotional.
    #[default]
    Empathy,
    /// Explaining something.
    Education,
    /// Selling something.
    Sales,
    /// Everyday life.
    Lifestyle,
}

impl StoryGoal {
    fn composition(self) -> &'static str {
        match self {
            Self::Empathy => {
                "centered composition with emotional focal point, warm and inviting atmosphere"
            }
            Self::Education => {
                "clean layout with clear visual hierarchy, educational content area in center"
            }
            Self::Sales => "dynamic composition with product showcase area, call-to-action space",
            Self::Lifestyle => "lifestyle-oriented composition, natural and authentic feel",
        }
    }
}

/// Visual mood of the background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Atmosphere {
    /// Clean and simple.
    #[default]
    Minimal,
    /// Refined.
    Elegant,
    /// Bright and playful.
    Poppy,
    /// Organic.
    Natural,
    /// Premium.
    Luxury,
    /// Sleek and modern.
    Futuristic,
}

impl Atmosphere {
    fn style(self) -> &'static str {
        match self {
            Self::Minimal => "minimalist, clean, simple",
            Self::Elegant => "elegant, sophisticated, refined",
            Self::Poppy => "vibrant, colorful, playful",
            Self::Natural => "natural, organic, earthy",
            Self::Luxury => "luxurious, premium, high-end",
            Self::Futuristic => "modern, futuristic, sleek",
        }
    }
}

/// Parameters for one batch of generated backgrounds.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Story script; each non-empty line becomes one slide.
    pub script: String,
    /// Visual theme.
    pub theme: String,
    /// Story goal.
    pub goal: StoryGoal,
    /// Visual mood.
    pub atmosphere: Atmosphere,
    /// Main brand color hint.
    pub brand_color: Option<Color>,
    /// Secondary color hint.
    pub sub_color: Option<Color>,
}

impl GenerationRequest {
    /// Reject requests with neither a script nor a theme.
    pub fn validate(&self) -> StoryResult<()> {
        if self.script.trim().is_empty() && self.theme.trim().is_empty() {
            return Err(StoryError::validation(
                "generation request needs a script or a theme",
            ));
        }
        Ok(())
    }

    /// Non-empty script lines, trimmed.
    pub fn script_lines(&self) -> Vec<&str> {
        self.script
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Number of slides: one per non-empty script line, at least one.
    pub fn slide_count(&self) -> u32 {
        (self.script_lines().len() as u32).max(1)
    }

    /// Theme, or [`DEFAULT_THEME`] when blank.
    pub fn effective_theme(&self) -> &str {
        let t = self.theme.trim();
        if t.is_empty() { DEFAULT_THEME } else { t }
    }

    /// Descriptive prompt for 1-based `slide`.
    pub fn prompt_for(&self, slide: u32) -> String {
        let theme = self.effective_theme();
        let lines = self.script_lines();
        let content = lines
            .get(slide.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(theme);

        let mut prompt = String::from("Instagram story background image, 9:16 aspect ratio, ");
        prompt.push_str(&format!(
            "theme: \"{theme}\", content for slide {slide}: \"{content}\", "
        ));
        prompt.push_str(self.atmosphere.style());
        prompt.push_str(" style, ");
        prompt.push_str(self.goal.composition());
        prompt.push_str(", large negative space in the center for text, ");
        prompt.push_str("top 12% and bottom 15% kept free of detail, ");
        match (self.brand_color, self.sub_color) {
            (Some(b), Some(s)) => prompt.push_str(&format!("brand colors: {b}, {s}, ")),
            (Some(b), None) => prompt.push_str(&format!("brand color: {b}, ")),
            _ => {}
        }
        prompt.push_str("no text, text-ready background");
        prompt
    }
}

#[cfg(test)]
#[path = "../../tests/unit/provider/request.rs"]
mod tests;
