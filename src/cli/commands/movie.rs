//! Movie selection, search and poster commands.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::movie::{Genre, GeminiClient, MovieInfo, TmdbClient};

use super::{build_movie_service, describe_poster, exit_not_configured};

/// Pick a movie for a genre disc and print it
pub fn cmd_movie(rt: &Runtime, config: &Config, genre: Genre, poster: bool) -> anyhow::Result<()> {
    let service = build_movie_service(config).generate_posters(poster && config.movies.generate_posters);

    if !service.has_database() && !service.has_generator() {
        println!("(No TMDb or Gemini key configured - using the built-in catalogue)");
    }

    rt.block_on(async {
        let movie = service.movie_for_genre(genre).await;
        let movie = if poster {
            service.ensure_poster(movie).await
        } else {
            movie
        };

        print_movie(&movie);
        if poster {
            match &movie.poster {
                Some(p) => println!("  Poster:   {}", describe_poster(p)),
                None => println!("  Poster:   (none)"),
            }
        }
    });
    Ok(())
}

/// Search TMDb and list the matches
pub fn cmd_search(rt: &Runtime, config: &Config, query: &str) -> anyhow::Result<()> {
    let Some(key) = config.credentials.tmdb_api_key.as_deref() else {
        exit_not_configured(
            &Error::not_configured("TMDb API key"),
            "Get one at https://www.themoviedb.org/settings/api, then set TMDB_API_KEY",
        );
    };
    let client = TmdbClient::new(key);

    rt.block_on(async {
        let results = client
            .search_movies(query)
            .await
            .with_context(format!("searching TMDb for {:?}", query))?;

        if results.is_empty() {
            println!("✗ No movies match {:?}", query);
            return anyhow::Ok(());
        }

        println!("✓ {} movies", results.len());
        for movie in results {
            println!(
                "  [{}] {} ({})",
                movie.tmdb_id,
                movie.title,
                movie.year.as_deref().unwrap_or("?")
            );
        }
        anyhow::Ok(())
    })
}

/// Generate a poster and print it as a data URL
pub fn cmd_poster(rt: &Runtime, config: &Config, prompt: &str) -> anyhow::Result<()> {
    let Some(key) = config.credentials.gemini_api_key.as_deref() else {
        exit_not_configured(
            &Error::not_configured("Gemini API key"),
            "Get one at https://aistudio.google.com/apikey, then set GEMINI_API_KEY",
        );
    };
    let client = GeminiClient::new(key);

    rt.block_on(async {
        match client.generate_poster(prompt).await {
            Ok(poster) => {
                eprintln!("✓ {}", describe_poster(&poster));
                println!("{}", poster.to_src());
            }
            Err(_) => eprintln!("✗ No poster was generated"),
        }
    });
    Ok(())
}

/// List the genre discs
pub fn cmd_genres() -> anyhow::Result<()> {
    println!("{:<10} {:<10} TMDb genre", "Disc", "Slug");
    for genre in Genre::ALL {
        println!(
            "{:<10} {:<10} {}",
            genre.display_name(),
            genre.slug(),
            genre.tmdb_genre_id()
        );
    }
    Ok(())
}

pub(crate) fn print_movie(movie: &MovieInfo) {
    println!("{} ({})", movie.title, movie.year);
    println!("  \"{}\"", movie.tagline);
    println!("  Genre:    {}", movie.genre);
    println!("  Director: {}", movie.director);
    println!("  Rating:   {}", movie.rating);
    println!("  {}", movie.plot);
}
