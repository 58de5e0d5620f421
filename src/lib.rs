// SPDX-License-Identifier: MIT

//! CanvasAI gamification backend.
//!
//! This crate provides the API for the study-progress gamification layer:
//! XP and leveling, daily streaks, badges, friendships, and leaderboards.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{FriendService, GamificationService, LeaderboardService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub gamification: GamificationService,
    pub friends: FriendService,
    pub leaderboard: LeaderboardService,
}
