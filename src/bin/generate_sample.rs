use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.range(0, items.len() as i64 - 1) as usize]
    }
}

const ARTISTS: [&str; 12] = [
    "The Beatles",
    "Miles Davis",
    "Radiohead",
    "Metallica",
    "Joni Mitchell",
    "Daft Punk",
    "Nina Simone",
    "Talking Heads",
    "Björk",
    "Kendrick Lamar",
    "Fleetwood Mac",
    "Boards of Canada",
];

const WORDS: [&str; 16] = [
    "Blue", "Electric", "Midnight", "Road", "Garden", "Echoes", "Paper", "Moon",
    "Northern", "Glass", "Summer", "Machine", "Silver", "River", "Static", "Light",
];

const GENRES: [&str; 10] = [
    "Rock",
    "Jazz",
    "Pop",
    "Heavy Metal",
    "Folk",
    "Electronic",
    "Soul",
    "Hip Hop",
    "Ambient",
    "Rock, Pop",
];

const MONTHS: [&str; 12] = [
    "Jan.", "Feb.", "March", "April", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.",
    "Dec.",
];

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_albums.csv".to_string());
    let count: usize = match args.next() {
        Some(n) => n.parse().context("album count must be a whole number")?,
        None => 60,
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record(["artist", "album", "year", "rating", "genre", "plays", "last-listen"])?;

    for _ in 0..count {
        let artist = rng.pick(&ARTISTS[..]);
        let album = format!("{} {}", rng.pick(&WORDS[..]), rng.pick(&WORDS[..]));
        let year = rng.range(1955, 2024);
        let rating = rng.range(0, 10) as f64 / 2.0;
        let genre = rng.pick(&GENRES[..]);
        let plays = rng.range(0, 40);

        // Mix ISO dates with the long form the listing page prints; leave
        // never-played albums blank.
        let last_listen = if plays == 0 {
            String::new()
        } else {
            let (y, m, d) = (rng.range(2017, 2024), rng.range(1, 12), rng.range(1, 28));
            if rng.next_f64() < 0.5 {
                format!("{y:04}-{m:02}-{d:02}")
            } else {
                format!("{} {d}, {y}", MONTHS[(m - 1) as usize])
            }
        };

        writer.write_record([
            artist.to_string(),
            album,
            year.to_string(),
            rating.to_string(),
            genre.to_string(),
            plays.to_string(),
            last_listen,
        ])?;
    }

    writer.flush()?;
    println!("Wrote {count} albums to {output_path}");
    Ok(())
}
