//! # TUI Components
//!
//! Widgets that paint the page state.
//!
//! ## Stateless (props only)
//!
//! - `TitleBar`: model, server health, status line
//! - `ParamsBar`: temperature and max-token sliders
//! - `Alert`: modal for window alerts
//!
//! ## Stateful
//!
//! - `InputBox`: owns the prompt editing buffer
//! - `TranscriptView`: transient wrapper over `TranscriptViewState`
//! - `ModelSwitcherView`: transient wrapper over `ModelSwitcherState`
//!
//! Persistent state lives in `TuiState`; wrappers are built every frame
//! with borrowed state plus props from the page.

mod alert;
mod input_box;
pub mod model_switcher;
mod params_bar;
mod title_bar;
mod transcript_view;

pub use alert::Alert;
pub use input_box::{InputBox, InputEvent};
pub use model_switcher::{ModelSwitcherState, ModelSwitcherView, SwitcherEvent};
pub use params_bar::ParamsBar;
pub use title_bar::TitleBar;
pub use transcript_view::{TranscriptView, TranscriptViewState};
