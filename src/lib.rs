//! # Grav-Twist Connect Four
//!
//! Connect Four on a square board that turns a quarter turn every few drops,
//! letting every piece fall again before lines are checked. Includes a
//! reflexive computer opponent and a terminal UI built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, gravity, rotation, line detection,
//!   game state
//! - [`ai`] — Agent trait, reflex move selector, random baseline
//! - [`arena`] — Headless agent-vs-agent matches and tallies
//! - [`ui`] — Terminal UI for playing against the computer or a friend
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
