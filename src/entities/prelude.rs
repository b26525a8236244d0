pub use super::anime::Entity as Anime;
pub use super::episodes::Entity as Episodes;
pub use super::ongoing_anime::Entity as OngoingAnime;
