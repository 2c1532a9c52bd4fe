//! User-facing texts and cards.

use spotiford_core::{Track, UserProfile};

use crate::chat::Card;

pub const DM_ONLY: &str = "For security reasons, spotiford should only be used via DM.";
pub const NOT_LOGGED_IN: &str = "For that, you have to be logged in.";
pub const INVALID_RESPONSE_URL: &str = "Sorry, you provided an invalid response url.";
pub const NOTHING_PLAYING: &str = "Nothing is playing right now.";
pub const ERROR_GENERIC: &str = "Sorry, an error occurred. Please try again later.";

pub fn login_prompt(authorize_url: &str) -> String {
    format!("Authorize with your Spotify client here: {}", authorize_url)
}

pub fn authorization_failed(prefix: &str) -> String {
    format!("Sorry, the authorization was unsuccessful. Please try again with `{prefix}login`.")
}

pub fn no_results(query: &str) -> String {
    format!("No tracks found for '{}'.", query)
}

pub fn saved(track: &Track) -> String {
    format!("Saved {} to your library.", track.name)
}

pub fn removed(track: &Track) -> String {
    format!("Removed {} from your library.", track.name)
}

pub fn unknown_command(prefix: &str, name: &str) -> String {
    format!(
        "Unknown command `{prefix}{name}`. Type `{prefix}help` for a list of commands."
    )
}

pub fn missing_argument(prefix: &str, usage: &str) -> String {
    format!("Usage: `{prefix}{usage}`")
}

pub fn help(prefix: &str) -> String {
    let rows = [
        ("login", "Link your Spotify account"),
        ("connect <url>", "Finish linking with the page you were redirected to"),
        ("account", "Show the linked account"),
        ("now", "Show the current track and like or unlike it"),
        ("play [query]", "Resume playback, or search and pick a track to play"),
        ("pause", "Pause playback (alias: stop)"),
        ("next", "Skip to the next track"),
        ("previous", "Go back to the previous track (alias: prev)"),
        ("queue <query>", "Search and pick a track to queue"),
        ("help", "Show this message"),
    ];

    let mut lines = vec!["**spotiford commands**".to_string()];
    for (usage, description) in rows {
        lines.push(format!("`{prefix}{usage}`: {description}"));
    }
    lines.join("\n")
}

/// Numbered search results. Field `n` corresponds to affordance `n`.
pub fn results_card(query: &str, tracks: &[Track]) -> Card {
    tracks.iter().enumerate().fold(
        Card::new(format!("Results for '{}'", query)),
        |card, (index, track)| {
            card.field(
                format!("#{} {} - {}", index + 1, track.artist_line(), track.name),
                track.album.clone(),
            )
        },
    )
}

pub fn track_card(track: &Track) -> Card {
    Card::new(track.name.clone())
        .description(track.artist_line())
        .thumbnail(track.image_url.clone())
}

pub fn profile_card(profile: &UserProfile) -> Card {
    Card::new(format!("Welcome, {}!", profile.display_name))
        .description("Successfully connected to your Spotify account.")
        .thumbnail(profile.image_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str, album: &str) -> Track {
        Track {
            uri: format!("spotify:track:{name}"),
            name: name.to_string(),
            artists: vec![artist.to_string()],
            album: album.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_results_card_numbers_from_one() {
        let card = results_card(
            "Daft Punk",
            &[
                track("One More Time", "Daft Punk", "Discovery"),
                track("Da Funk", "Daft Punk", "Homework"),
            ],
        );

        insta::assert_debug_snapshot!(card, @r###"
        Card {
            title: "Results for 'Daft Punk'",
            description: None,
            fields: [
                CardField {
                    name: "#1 Daft Punk - One More Time",
                    value: "Discovery",
                },
                CardField {
                    name: "#2 Daft Punk - Da Funk",
                    value: "Homework",
                },
            ],
            thumbnail_url: None,
        }
        "###);
    }

    #[test]
    fn test_library_confirmations() {
        let t = track("Digital Love", "Daft Punk", "Discovery");
        assert_eq!(saved(&t), "Saved Digital Love to your library.");
        assert_eq!(removed(&t), "Removed Digital Love from your library.");
    }

    #[test]
    fn test_help_uses_prefix() {
        let text = help("!");
        assert!(text.contains("`!queue <query>`"));
        assert!(!text.contains("`-"));
    }
}
