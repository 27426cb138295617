//! Canned movies, one per genre.
//!
//! Used when neither TMDb nor the generator is configured or reachable.

use super::domain::{Genre, MovieInfo, generated_id};

struct CannedMovie {
    title: &'static str,
    year: &'static str,
    director: &'static str,
    plot: &'static str,
    tagline: &'static str,
    rating: &'static str,
}

fn canned(genre: Genre) -> CannedMovie {
    match genre {
        Genre::SciFi => CannedMovie {
            title: "Cosmic Drifters",
            year: "1987",
            director: "Dr. Zephyr Nova",
            plot: "In a distant future, space explorers discover a planet where time moves backwards. They must race against reverse entropy to save their home world.",
            tagline: "Time is running out... backwards!",
            rating: "4.5/5",
        },
        Genre::Noir => CannedMovie {
            title: "Shadows in the Rain",
            year: "1974",
            director: "Max Blackwood",
            plot: "A private detective gets entangled in a web of corruption when a mysterious woman hires him to find her missing husband.",
            tagline: "In the city of lies, truth is the deadliest weapon.",
            rating: "4.7/5",
        },
        Genre::Western => CannedMovie {
            title: "Dust & Glory",
            year: "1982",
            director: "Clint Rivers",
            plot: "A retired gunslinger must return to his violent past when bandits threaten the small town that gave him peace.",
            tagline: "Some men can never hang up their guns.",
            rating: "4.3/5",
        },
        Genre::Horror => CannedMovie {
            title: "The Whispering Walls",
            year: "1979",
            director: "Victoria Graves",
            plot: "A family moves into an old mansion where the walls literally speak, revealing the dark secrets of previous tenants.",
            tagline: "The house remembers... and it wants revenge.",
            rating: "4.6/5",
        },
        Genre::RomCom => CannedMovie {
            title: "Love in Transit",
            year: "1991",
            director: "Penny Heart",
            plot: "Two strangers keep missing each other on the same subway line, until fate finally brings them together.",
            tagline: "Sometimes the best love stories start with a missed connection.",
            rating: "4.4/5",
        },
        Genre::KungFu => CannedMovie {
            title: "Dragon's Path",
            year: "1985",
            director: "Master Chen",
            plot: "A young martial artist must master the ancient Dragon Style to defeat an evil warlord threatening his village.",
            tagline: "The way of the dragon is the path to honor.",
            rating: "4.8/5",
        },
    }
}

/// Prompt for generating a poster in the widget's vintage style.
pub fn poster_prompt(genre: Genre, year: &str) -> String {
    format!(
        "Vintage {} movie poster from the {}s, painted style, distressed texture, dramatic lighting",
        genre, year
    )
}

/// The canned movie for `genre`.
pub fn movie_for(genre: Genre) -> MovieInfo {
    let movie = canned(genre);
    MovieInfo {
        id: generated_id(genre, movie.title),
        title: movie.title.to_string(),
        year: movie.year.to_string(),
        director: movie.director.to_string(),
        plot: movie.plot.to_string(),
        tagline: movie.tagline.to_string(),
        rating: movie.rating.to_string(),
        genre,
        poster: None,
        poster_prompt: Some(poster_prompt(genre, movie.year)),
        tmdb_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_genre_has_a_movie() {
        for genre in Genre::ALL {
            let movie = movie_for(genre);
            assert!(!movie.title.is_empty());
            assert_eq!(movie.genre, genre);
            assert!(movie.poster_prompt.as_deref().unwrap().contains(genre.display_name()));
        }
    }

    #[test]
    fn test_western_is_dust_and_glory() {
        let movie = movie_for(Genre::Western);
        assert_eq!(movie.title, "Dust & Glory");
        assert_eq!(movie.id, "western-dust-glory");
    }
}
