//! The RetroView TV: insert a genre disc, watch a movie, hear its soundtrack.
//!
//! `RetroTv` owns the screen state, the current resolution session and the
//! watch list. Movie selection is delegated to [`MovieService`] and
//! soundtrack lookups run in the background on the [`SoundtrackResolver`].

use std::sync::Arc;

use futures::channel::mpsc;

use crate::movie::{Genre, MovieInfo, MovieService};
use crate::session::ResolutionSession;
use crate::soundtrack::{MetadataApi, SoundtrackResolver, Subject, Track, TrackSearchApi};

/// Stream of cumulative track lists for the playing movie
pub type SoundtrackUpdates = mpsc::UnboundedReceiver<Vec<Track>>;

/// What the screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum TvState {
    Off,
    Idle,
    Loading,
    Playing(MovieInfo),
}

pub struct RetroTv<M, S> {
    movies: MovieService,
    resolver: Arc<SoundtrackResolver<M, S>>,
    state: TvState,
    session: Option<ResolutionSession>,
    watch_list: Vec<MovieInfo>,
}

impl<M, S> RetroTv<M, S>
where
    M: MetadataApi + 'static,
    S: TrackSearchApi + 'static,
{
    /// A TV that starts switched off
    pub fn new(movies: MovieService, resolver: Arc<SoundtrackResolver<M, S>>) -> Self {
        Self {
            movies,
            resolver,
            state: TvState::Off,
            session: None,
            watch_list: Vec::new(),
        }
    }

    pub fn state(&self) -> &TvState {
        &self.state
    }

    pub fn is_on(&self) -> bool {
        self.state != TvState::Off
    }

    /// The movie on screen, if any.
    pub fn now_playing(&self) -> Option<&MovieInfo> {
        match &self.state {
            TvState::Playing(movie) => Some(movie),
            _ => None,
        }
    }

    pub fn power_on(&mut self) {
        if self.state == TvState::Off {
            self.state = TvState::Idle;
        }
    }

    /// Switch off and drop the current soundtrack session.
    ///
    /// A lookup already in flight still finishes and fills the cache.
    pub fn power_off(&mut self) {
        self.state = TvState::Off;
        self.session = None;
    }

    /// Insert a disc. Turns the TV on if needed, picks a movie and starts
    /// its soundtrack lookup.
    pub async fn insert_disc(&mut self, genre: Genre) -> SoundtrackUpdates {
        tracing::info!("Disc inserted: {}", genre);
        self.state = TvState::Loading;
        self.session = None;

        let movie = self.movies.movie_for_genre(genre).await;
        self.play(movie)
    }

    /// Replay a movie from the watch list. `None` if `index` is out of range.
    pub async fn select_from_watch_list(&mut self, index: usize) -> Option<SoundtrackUpdates> {
        let saved = self.watch_list.get(index)?.clone();
        self.state = TvState::Loading;
        self.session = None;

        let movie = self.movies.ensure_poster(saved).await;
        Some(self.play(movie))
    }

    fn play(&mut self, movie: MovieInfo) -> SoundtrackUpdates {
        let subject = Subject::new(movie.id.clone(), movie.title.clone());
        tracing::info!("Now playing: {} ({})", movie.title, movie.year);

        self.session = Some(ResolutionSession::new(subject.clone()));
        self.state = TvState::Playing(movie);
        self.resolver.spawn(subject)
    }

    pub fn session(&self) -> Option<&ResolutionSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ResolutionSession> {
        self.session.as_mut()
    }

    /// Feed a soundtrack update into the current session.
    ///
    /// Updates for a movie that is no longer playing are dropped.
    pub fn apply_update(&mut self, subject_id: &str, tracks: &[Track]) -> bool {
        match self.session.as_mut() {
            Some(session) if session.subject().id == subject_id => session.apply_update(tracks),
            _ => false,
        }
    }

    /// Save a movie for later. Titles already on the list are not added twice.
    pub fn add_to_watch_list(&mut self, movie: MovieInfo) -> bool {
        if self.watch_list.iter().any(|m| m.title == movie.title) {
            return false;
        }
        self.watch_list.push(movie);
        true
    }

    pub fn watch_list(&self) -> &[MovieInfo] {
        &self.watch_list
    }
}
