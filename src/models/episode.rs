use crate::domain::AnimeCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub anime_code: AnimeCode,
    pub episode_number: i32,
    /// Opaque content handle; never interpreted by the catalog.
    pub video_file_id: String,
}

impl Episode {
    pub fn new(
        anime_code: impl Into<AnimeCode>,
        episode_number: i32,
        video_file_id: impl Into<String>,
    ) -> Self {
        Self {
            anime_code: anime_code.into(),
            episode_number,
            video_file_id: video_file_id.into(),
        }
    }
}
