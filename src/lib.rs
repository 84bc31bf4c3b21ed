//! # Movie Updates Telegram Bot
//!
//! A Telegram bot that relays movie listings from the TMDB catalog:
//! what is playing now, what is trending this week, upcoming releases and
//! title search, each rendered as a poster with caption or as plain text.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod movie_format;
pub mod webhook;
