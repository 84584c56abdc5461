use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use travelog::config::Config;
use travelog::journal::Journal;
use travelog::locale::{format_local_date_long, format_photo_count};
use travelog::preferences::{self, ThemePreference};
use travelog::{db, logging, GeoPoint, NewPhoto, PhotoId, TripId};

const BAR_WIDTH: f64 = 30.0;

enum Command {
    Trips,
    AddTrip { title: String, description: String },
    EditTrip { id: TripId, title: String, description: String },
    DeleteTrip(TripId),
    Photos(TripId),
    AddPhoto {
        trip_id: TripId,
        uris: Vec<String>,
        description: String,
        location: Option<GeoPoint>,
    },
    DeletePhoto(PhotoId),
    Stats,
    Theme(Option<ThemePreference>),
    Clear { confirmed: bool },
}

struct Args {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path = None;
    let mut positional = Vec::new();
    let mut description = None;
    let mut lat = None;
    let mut lon = None;
    let mut confirmed = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("travelog {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(option_value(&args, &mut i, "--config")?));
            }
            "--desc" | "-d" => {
                description = Some(option_value(&args, &mut i, "--desc")?.to_string());
            }
            "--lat" => {
                lat = Some(parse_number::<f64>(option_value(&args, &mut i, "--lat")?, "--lat")?);
            }
            "--lon" => {
                lon = Some(parse_number::<f64>(option_value(&args, &mut i, "--lon")?, "--lon")?);
            }
            "--yes" | "-y" => confirmed = true,
            other if other.starts_with('-') && other.len() > 1 && other.parse::<f64>().is_err() => {
                bail!("Unknown argument: {}", other);
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        (None, None) => None,
        _ => bail!("--lat and --lon must be given together"),
    };

    let mut positional = positional.into_iter();
    let name = positional.next().unwrap_or_else(|| "trips".to_string());
    let rest: Vec<String> = positional.collect();

    let command = match name.as_str() {
        "trips" => Command::Trips,
        "add-trip" => {
            let title = rest.first().context("add-trip requires a TITLE")?.clone();
            let description = rest.get(1).cloned().or(description).unwrap_or_default();
            Command::AddTrip { title, description }
        }
        "edit-trip" => {
            let id = TripId(parse_id(rest.first(), "edit-trip")?);
            let title = rest.get(1).context("edit-trip requires a TITLE")?.clone();
            let description = rest.get(2).cloned().or(description).unwrap_or_default();
            Command::EditTrip { id, title, description }
        }
        "delete-trip" => Command::DeleteTrip(TripId(parse_id(rest.first(), "delete-trip")?)),
        "photos" => Command::Photos(TripId(parse_id(rest.first(), "photos")?)),
        "add-photo" => {
            let trip_id = TripId(parse_id(rest.first(), "add-photo")?);
            let uris: Vec<String> = rest.iter().skip(1).cloned().collect();
            if uris.is_empty() {
                bail!("add-photo requires at least one URI");
            }
            Command::AddPhoto {
                trip_id,
                uris,
                description: description.unwrap_or_default(),
                location,
            }
        }
        "delete-photo" => Command::DeletePhoto(PhotoId(parse_id(rest.first(), "delete-photo")?)),
        "stats" => Command::Stats,
        "theme" => match rest.first() {
            Some(value) => Command::Theme(Some(
                value.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            )),
            None => Command::Theme(None),
        },
        "clear" => Command::Clear { confirmed },
        other => bail!("Unknown command: {}", other),
    };

    Ok(Args { config_path, command })
}

fn option_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    if *i + 1 < args.len() {
        *i += 1;
        Ok(&args[*i])
    } else {
        bail!("{} requires a value", flag)
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: {}", what, value))
}

fn parse_id(value: Option<&String>, command: &str) -> Result<u64> {
    let value = value.with_context(|| format!("{} requires an ID", command))?;
    parse_number(value, command)
}

fn print_help() {
    println!(
        r#"travelog - personal travel journal

USAGE:
    travelog [OPTIONS] [COMMAND]

COMMANDS:
    trips                               List trips, newest first (default)
    add-trip TITLE [DESCRIPTION]        Add a trip
    edit-trip ID TITLE [DESCRIPTION]    Change a trip's title and description
    delete-trip ID                      Delete a trip and all of its photos
    photos TRIP_ID                      List a trip's photos, newest first
    add-photo TRIP_ID URI...            Attach photos to a trip
        --desc, -d TEXT                 Description for the added photos
        --lat X --lon Y                 Location for the added photos
    delete-photo ID                     Delete a photo
    stats                               Show journal statistics
    theme [light|dark]                  Show or set the theme preference
    clear --yes                         Delete ALL trips and photos

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    TRAVELOG_CONFIG     Path to config file (overrides default location)
    TRAVELOG_LOG        Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/travelog/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    // Best effort; the CLI works without a subscriber
    let _ = logging::init(Some(Config::log_dir()));

    let config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let store = db::open(&config.storage)?;
    let mut journal = Journal::open(store.clone(), config.storage.data_key.clone()).await;

    match args.command {
        Command::Trips => {
            let trips = journal.list_trips_by_date(true);
            if trips.is_empty() {
                println!("No trips yet. Add one with `travelog add-trip TITLE`.");
            }
            for trip in trips {
                println!(
                    "#{:<4} {}  ({}, {})",
                    trip.id,
                    trip.title,
                    format_local_date_long(&trip.date),
                    format_photo_count(journal.photo_count(trip.id) as u64)
                );
                if !trip.description.is_empty() {
                    println!("      {}", trip.description);
                }
            }
        }
        Command::AddTrip { title, description } => {
            let trip = journal.add_trip(&title, &description).await?;
            println!("Added trip #{} {}", trip.id, trip.title);
        }
        Command::EditTrip { id, title, description } => {
            let trip = journal.update_trip(id, &title, &description).await?;
            println!("Updated trip #{} {}", trip.id, trip.title);
        }
        Command::DeleteTrip(id) => {
            let photos = journal.photo_count(id) as u64;
            journal.delete_trip(id).await?;
            println!("Deleted trip #{} ({} removed)", id, format_photo_count(photos));
        }
        Command::Photos(trip_id) => {
            let trip = journal
                .trip(trip_id)
                .with_context(|| format!("Trip {} not found", trip_id))?;
            println!("{} ({})", trip.title, format_local_date_long(&trip.date));
            for photo in journal.list_photos_for_trip(trip_id) {
                println!("#{:<4} {}", photo.id, photo.uri);
                if !photo.description.is_empty() {
                    println!("      {}", photo.description);
                }
                if let Some(location) = photo.location {
                    println!("      {}", location.map_url(config.display.map_platform));
                }
            }
        }
        Command::AddPhoto { trip_id, uris, description, location } => {
            let drafts = uris
                .into_iter()
                .map(|uri| NewPhoto { uri, description: description.clone(), location })
                .collect();
            let added = journal.add_photos(trip_id, drafts).await?;
            println!("Added {}", format_photo_count(added.len() as u64));
        }
        Command::DeletePhoto(id) => {
            journal.delete_photo(id).await?;
            println!("Deleted photo #{}", id);
        }
        Command::Stats => {
            let stats = journal.stats();
            println!("Trips:           {}", stats.total_trips);
            println!("Photos:          {}", stats.total_photos);
            println!("Photos per trip: {}", stats.photos_per_trip);
            if stats.per_trip.is_empty() {
                println!("\nAdd trips and photos to see statistics.");
            } else {
                println!();
            }
            for stat in &stats.per_trip {
                let bar = "#".repeat((stats.bar_ratio(stat) * BAR_WIDTH).round() as usize);
                println!("{:<24} {:<30} {}", stat.trip.title, bar, stat.count_text());
            }
        }
        Command::Theme(None) => {
            let theme = preferences::load_theme(store.as_ref(), ThemePreference::default()).await;
            println!("{}", theme);
        }
        Command::Theme(Some(theme)) => {
            preferences::save_theme(store.as_ref(), theme).await?;
            println!("Theme set to {}", theme);
        }
        Command::Clear { confirmed } => {
            if !confirmed {
                bail!("This deletes ALL trips and photos and cannot be undone; pass --yes to confirm");
            }
            journal.clear_all().await?;
            println!("All trips and photos deleted");
        }
    }

    Ok(())
}
