//! Domain types shared across the repository, service, and HTTP layers.

pub mod anime;
pub mod user;

pub use anime::{Anime, AnimeChanges, AnimeId, NewAnime, Season};
pub use user::{NewUser, PublicUser, User, UserChanges, UserId};
