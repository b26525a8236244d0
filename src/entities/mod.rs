pub mod prelude;

pub mod anime;
pub mod episodes;
pub mod ongoing_anime;
