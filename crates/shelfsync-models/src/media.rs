use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
    Season,
    Episode,
}

impl MediaType {
    /// Map a catalog export title type onto a media type. The catalog uses a
    /// handful of labels for theatrical releases; anything unrecognised is
    /// treated as a movie.
    pub fn from_title_type(title_type: &str) -> Self {
        match title_type {
            "tvSeries" | "tvMiniSeries" => MediaType::Show,
            "tvEpisode" => MediaType::Episode,
            _ => MediaType::Movie,
        }
    }

    /// Plural form used in tracker API paths, e.g. `sync/history/movies/{id}`.
    pub fn plural(&self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Show => "shows",
            MediaType::Season => "seasons",
            MediaType::Episode => "episodes",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Season => "season",
            MediaType::Episode => "episode",
        };
        write!(f, "{s}")
    }
}
