pub mod backend;
pub mod boundaries;
pub mod color;
pub mod config;
pub mod demo_feed;
pub mod http_client;
pub mod model;
pub mod provider;
pub mod roster;
pub mod selection;
pub mod state;
pub mod steam_id;
