//! Grammar checker: corrects free text through a chat-style language-model
//! service, highlights what changed, scores readability and reads the result
//! aloud.
//!
//! | Module | Role |
//! |--------|------|
//! | [`analysis`] | word-level diff, highlight spans, readability statistics |
//! | [`correction`] | options, prompt, backend transport, correction service |
//! | [`pipeline`] | one correction run, shared session state, background runner |
//! | [`speech`] | speech engines and the playback state machine |
//! | [`export`] | clipboard and plain-text file output |
//! | [`config`] | TOML settings and platform paths |
//! | [`app`] | the egui window |

pub mod analysis;
pub mod app;
pub mod config;
pub mod correction;
pub mod export;
pub mod pipeline;
pub mod speech;
