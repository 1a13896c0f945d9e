//! The prompt form: text input plus the two generation-parameter sliders.

use crate::api::GenerationParameters;
use crate::core::config::ResolvedConfig;

/// A range slider. Values are clamped to `[min, max]` and snapped to `step`,
/// which is the only validation parameters ever get.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeInput {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl RangeInput {
    pub fn new(min: f64, max: f64, step: f64, value: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut input = Self {
            min,
            max,
            step,
            value: min,
        };
        input.set(value);
        input
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn set(&mut self, value: f64) {
        let clamped = value.clamp(self.min, self.max);
        let snapped = if self.step > 0.0 {
            let steps = ((clamped - self.min) / self.step).round();
            (self.min + steps * self.step).min(self.max)
        } else {
            clamped
        };
        let scale = 10f64.powi(self.decimals() as i32);
        self.value = (snapped * scale).round() / scale;
    }

    pub fn step_up(&mut self) {
        self.set(self.value + self.step);
    }

    pub fn step_down(&mut self) {
        self.set(self.value - self.step);
    }

    /// The value as the slider's label shows it.
    pub fn value_text(&self) -> String {
        format!("{:.*}", self.decimals(), self.value)
    }

    /// Fraction of the range covered, for drawing a gauge.
    pub fn ratio(&self) -> f64 {
        if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            1.0
        }
    }

    fn decimals(&self) -> usize {
        let step = self.step.to_string();
        step.split_once('.').map_or(0, |(_, frac)| frac.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptForm {
    pub prompt: String,
    pub temperature: RangeInput,
    pub max_tokens: RangeInput,
}

impl PromptForm {
    pub fn new(temperature: RangeInput, max_tokens: RangeInput) -> Self {
        Self {
            prompt: String::new(),
            temperature,
            max_tokens,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            RangeInput::new(
                config.temperature_min,
                config.temperature_max,
                config.temperature_step,
                config.temperature,
            ),
            RangeInput::new(
                config.max_tokens_min as f64,
                config.max_tokens_max as f64,
                config.max_tokens_step as f64,
                config.max_tokens as f64,
            ),
        )
    }

    pub fn parameters(&self) -> GenerationParameters {
        GenerationParameters {
            temperature: self.temperature.value() as f32,
            max_tokens: self.max_tokens.value().round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature() -> RangeInput {
        RangeInput::new(0.0, 1.0, 0.1, 0.7)
    }

    #[test]
    fn stepping_stays_on_the_grid() {
        let mut t = temperature();
        t.step_down();
        t.step_down();
        t.step_down();
        assert_eq!(t.value(), 0.4);
        assert_eq!(t.value_text(), "0.4");
    }

    #[test]
    fn values_clamp_to_range() {
        let mut t = temperature();
        for _ in 0..20 {
            t.step_up();
        }
        assert_eq!(t.value(), 1.0);
        t.set(-3.0);
        assert_eq!(t.value(), 0.0);
    }

    #[test]
    fn off_grid_values_snap() {
        let tokens = RangeInput::new(100.0, 4000.0, 100.0, 1049.0);
        assert_eq!(tokens.value(), 1000.0);
        assert_eq!(tokens.value_text(), "1000");
    }

    #[test]
    fn swapped_bounds_are_normalised() {
        let input = RangeInput::new(1.0, 0.0, 0.1, 0.5);
        assert_eq!(input.min(), 0.0);
        assert_eq!(input.max(), 1.0);
        assert_eq!(input.value(), 0.5);
    }

    #[test]
    fn parameters_come_from_controls() {
        let form = PromptForm::new(temperature(), RangeInput::new(100.0, 4000.0, 100.0, 256.0));
        let params = form.parameters();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.max_tokens, 300);
    }

    #[test]
    fn configured_defaults_show_clean_values() {
        let form = PromptForm::from_config(&ResolvedConfig::default());
        assert_eq!(form.temperature.value(), 0.7);
        assert_eq!(form.temperature.value_text(), "0.7");
        assert_eq!(form.max_tokens.value_text(), "1000");

        let mut stepped = form.clone();
        stepped.temperature.step_up();
        assert_eq!(stepped.temperature.value_text(), "0.8");
    }

    #[test]
    fn configured_token_step_keeps_exact_values() {
        let mut form = PromptForm::from_config(&ResolvedConfig::default());
        form.max_tokens.set(256.0);
        assert_eq!(form.parameters().max_tokens, 256);
        assert_eq!(form.parameters().temperature, 0.7);
    }

    #[test]
    fn ratio_tracks_position() {
        assert!((temperature().ratio() - 0.7).abs() < 1e-9);
    }
}
