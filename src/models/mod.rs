mod interaction;
mod movie;
mod user;

pub use interaction::{
    InteractionKind, Rating, RatingRecord, WatchlistRecord, HIGH_SIGNAL_THRESHOLD,
};
pub use movie::{Genre, MovieDetail, Payload};
pub use user::{AccessToken, User};
