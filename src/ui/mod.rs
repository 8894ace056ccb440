//! Terminal UI: play Grav-Twist against the computer or a second player.

mod app;
mod game_view;

pub use app::App;
