//! Mindful: a CBT-informed chat and mood-journal backend for students.
//!
//! Each chat turn runs keyword classifiers over the latest user message,
//! resolves the tone persona, assembles the prompt and asks a completion
//! provider for a reply. Journal entries get a 1–10 mood score, emotion
//! labels and a short insight, and are stored per user in SQLite.
//!
//! # Layout
//!
//! - [`config`], [`logging`]: TOML plus environment configuration, tracing setup
//! - [`providers`]: the [`providers::LlmProvider`] seam and the OpenAI-compatible client
//! - [`classifier`]: keyword lists for crisis, breathing, journaling and calming audio
//! - [`persona`], [`prompt`], [`reply`]: tone fragments, prompt assembly, response shaping
//! - [`chat`]: one chat turn end to end; provider failures are errors
//! - [`journal`]: mood analysis and insights (soft-fail) and the SQLite entry store
//! - [`api`]: axum routes over the chat and journal pipelines

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod providers;

pub mod classifier;
pub mod persona;
pub mod prompt;
pub mod reply;

pub mod chat;
pub mod journal;

pub mod api;
