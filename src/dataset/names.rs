//! Built-in vocabulary for display names, countries, titles and emails.

use super::random_source::RandomSource;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Lisa", "Matthew", "Nancy", "Anthony", "Betty", "Mark", "Sandra",
    "Donald", "Ashley", "Steven", "Kimberly", "Andrew", "Emily", "Joshua", "Donna", "Kenneth",
    "Michelle", "Kevin", "Carol", "Brian", "Amanda", "Timothy", "Melissa", "Ronald", "Deborah",
    "Luca", "Giulia", "Mateo", "Sofia", "Yuki", "Aiko", "Omar", "Amara", "Lars", "Ingrid",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright", "Scott",
    "Rossi", "Bianchi", "Tanaka", "Sato", "Okafor", "Haddad", "Nilsson", "Kowalski", "Novak",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Austria", "Belgium", "Brazil", "Canada", "Chile", "Colombia",
    "Denmark", "Egypt", "Finland", "France", "Germany", "Ghana", "Greece", "Iceland", "India",
    "Ireland", "Italy", "Jamaica", "Japan", "Kenya", "Mexico", "Morocco", "Netherlands",
    "New Zealand", "Nigeria", "Norway", "Peru", "Poland", "Portugal", "South Africa",
    "South Korea", "Spain", "Sweden", "Switzerland", "Turkey", "United Kingdom", "United States",
    "Uruguay",
];

const WORDS: &[&str] = &[
    "amber", "echo", "river", "velvet", "neon", "hollow", "silver", "golden", "paper", "crystal",
    "midnight", "summer", "winter", "electric", "quiet", "wild", "broken", "distant", "open",
    "secret", "ocean", "desert", "city", "garden", "mirror", "shadow", "fire", "stone", "glass",
    "thunder", "cloud", "harbor", "signal", "orbit", "atlas", "canyon", "lantern", "meadow",
    "prism", "static",
];

const ALBUM_SERIES: &[&str] = &["Vol", "Collection", "Series"];

const SONG_NOUNS: &[&str] = &["Love", "Night", "Dream", "Light", "Sound"];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

fn pick(rng: &mut RandomSource, pool: &'static [&'static str]) -> &'static str {
    pool[rng.index(pool.len())]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn person_name(rng: &mut RandomSource) -> String {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    format!("{} {}", first, last)
}

pub fn country(rng: &mut RandomSource) -> String {
    pick(rng, COUNTRIES).to_string()
}

/// "{Word} {Vol|Collection|Series} {1..99}"
pub fn album_name(rng: &mut RandomSource) -> String {
    let word = capitalize(pick(rng, WORDS));
    let series = pick(rng, ALBUM_SERIES);
    let number = rng.int_between(1, 99);
    format!("{} {} {}", word, series, number)
}

/// "{Word} {Love|Night|Dream|Light|Sound}"
pub fn song_title(rng: &mut RandomSource) -> String {
    let word = capitalize(pick(rng, WORDS));
    let noun = pick(rng, SONG_NOUNS);
    format!("{} {}", word, noun)
}

/// Email local part built from the name's words, e.g. "mary.lee42@example.org".
pub fn email_for(name: &str, rng: &mut RandomSource) -> String {
    let local = name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    let local = if local.is_empty() {
        "listener".to_string()
    } else {
        local
    };
    let suffix = rng.int_between(1, 99);
    let domain = pick(rng, EMAIL_DOMAINS);
    format!("{}{}@{}", local, suffix, domain)
}
