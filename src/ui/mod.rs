pub mod app;
pub mod board;
pub mod config;
pub mod dialogs;
pub mod game;
pub mod highscore;
pub mod hud;
pub mod scene;
pub mod state;
