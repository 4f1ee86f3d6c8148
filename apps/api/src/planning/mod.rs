// Weekly content planning: stored profile + products → 7-day multi-platform schedule.
// Captions and image prompts come from string templates, not a language model.

pub mod builder;
pub mod handlers;
pub mod store;
pub mod templates;
