pub mod api;
pub mod cards;
pub mod carousel;
pub mod config;
pub mod embedded;
pub mod models;
pub mod pages;
pub mod rating;
pub mod toggle;
pub mod utils;
pub mod view;
pub mod widgets;
