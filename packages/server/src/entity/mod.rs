pub mod artist_profile;
pub mod counter;
pub mod event;
pub mod jury_profile;
pub mod news_item;
pub mod partner;
pub mod score;
pub mod submission;
pub mod user;
