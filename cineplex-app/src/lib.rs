use anyhow::{bail, Context};
use cineplex_booking::{AvailabilitySnapshot, BookingRecord, BoxOffice, Rejection};
use cineplex_catalog::{
    AudiResolver, Catalog, PricingEngine, SeatMap, SeatType, ShowtimeDay, TimeZoneSlotGrouper,
};
use cineplex_shared::{MovieId, Navigation, Notification, SeatId};
use cineplex_store::app_config::Config;
use cineplex_store::SeatInventoryStore;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Wire every component once, sharing the storage backend by handle.
pub fn build_box_office(config: &Config) -> anyhow::Result<BoxOffice> {
    let catalog = Catalog::load(&config.catalog.path)
        .with_context(|| format!("Failed to load catalog {}", config.catalog.path))?;
    let grouper = TimeZoneSlotGrouper::from_name(&config.schedule.timezone)?;
    let backend = cineplex_store::open_backend(&config.storage).context("Failed to open booking storage")?;

    let layout = Arc::new(SeatMap::default());
    let pricing = Arc::new(PricingEngine::new(config.pricing.clone(), layout.clone()));

    Ok(BoxOffice::new(
        Arc::new(catalog),
        SeatInventoryStore::new(backend, config.storage.key_prefix.clone()),
        layout,
        pricing,
        grouper,
        AudiResolver::new(grouper.timezone(), config.theater.default_auditorium.clone()),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Movies,
    Showtimes { movie_id: MovieId },
    Seats { movie_id: MovieId, slot: String },
    Book { movie_id: MovieId, slot: String, seats: Vec<String> },
}

impl Command {
    /// `movies` | `showtimes <movie>` | `seats <movie> <slot>` | `book <movie> <slot> <seat>...`
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let command = match args.next().as_deref() {
            None | Some("movies") => Command::Movies,
            Some("showtimes") => Command::Showtimes {
                movie_id: next_movie_id(&mut args)?,
            },
            Some("seats") => Command::Seats {
                movie_id: next_movie_id(&mut args)?,
                slot: args.next().unwrap_or_default(),
            },
            Some("book") => Command::Book {
                movie_id: next_movie_id(&mut args)?,
                slot: args.next().unwrap_or_default(),
                seats: args.by_ref().collect(),
            },
            Some(other) => bail!("Unknown command {:?}", other),
        };
        Ok(command)
    }
}

fn next_movie_id(args: &mut impl Iterator<Item = String>) -> anyhow::Result<MovieId> {
    let raw = args.next().context("Missing movie id")?;
    raw.parse().with_context(|| format!("Invalid movie id {:?}", raw))
}

#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub base_price: u32,
    pub showtimes: Vec<ShowtimeDay>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum Response {
    Movies {
        movies: Vec<MovieSummary>,
    },
    Showtimes {
        movie_id: MovieId,
        days: Vec<ShowtimeDay>,
    },
    Seats {
        tiers: Vec<(SeatType, u32)>,
        availability: AvailabilitySnapshot,
    },
    Booking {
        notifications: Vec<Notification>,
        record: Option<BookingRecord>,
    },
    Rejected {
        reason: String,
        notification: Notification,
        navigation: Navigation,
    },
}

impl From<Rejection> for Response {
    fn from(rejection: Rejection) -> Self {
        Response::Rejected {
            reason: rejection.error.to_string(),
            notification: rejection.notification,
            navigation: rejection.navigation,
        }
    }
}

pub fn run(office: &BoxOffice, command: Command) -> Response {
    match command {
        Command::Movies => Response::Movies {
            movies: office
                .catalog()
                .movies()
                .iter()
                .map(|movie| MovieSummary {
                    id: movie.id,
                    title: movie.title.clone(),
                    base_price: movie.base_price,
                    showtimes: office.showtimes(movie.id).unwrap_or_default(),
                })
                .collect(),
        },
        Command::Showtimes { movie_id } => match office.showtimes(movie_id) {
            Ok(days) => Response::Showtimes { movie_id, days },
            Err(rejection) => rejection.into(),
        },
        Command::Seats { movie_id, slot } => {
            let seats = office
                .tier_prices(movie_id)
                .and_then(|tiers| office.availability(movie_id, &slot).map(|snapshot| (tiers, snapshot)));
            match seats {
                Ok((tiers, availability)) => Response::Seats { tiers, availability },
                Err(rejection) => rejection.into(),
            }
        }
        Command::Book { movie_id, slot, seats } => book(office, movie_id, &slot, &seats),
    }
}

fn book(office: &BoxOffice, movie_id: MovieId, slot: &str, seats: &[String]) -> Response {
    let mut session = match office.open_session(movie_id, slot) {
        Ok(session) => session,
        Err(rejection) => return rejection.into(),
    };

    let mut notifications = Vec::new();
    // Each label selects; repeating one must not toggle it back off
    let mut requested = BTreeSet::new();
    for label in seats {
        match label.parse::<SeatId>() {
            Ok(seat) if !requested.insert(seat) => {
                tracing::debug!("Seat {} listed more than once", seat);
            }
            Ok(seat) => notifications.extend(office.toggle_seat(&mut session, &seat)),
            Err(err) => {
                tracing::warn!("Ignoring seat {:?}: {}", label, err);
                notifications.push(Notification::error(format!("Seat {} does not exist", label)));
            }
        }
    }

    let outcome = office.confirm(&mut session);
    notifications.push(outcome.notification);
    Response::Booking {
        notifications,
        record: outcome.record,
    }
}
