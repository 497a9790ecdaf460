use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

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

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

struct City {
    file: &'static str,
    stations: &'static [&'static str],
    demographics: bool,
    trips: usize,
}

const CITIES: [City; 3] = [
    City {
        file: "chicago.csv",
        stations: &[
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Clinton St & Washington Blvd",
            "Canal St & Adams St",
            "Michigan Ave & Oak St",
        ],
        demographics: true,
        trips: 1500,
    },
    City {
        file: "new_york_city.csv",
        stations: &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "Broadway & E 22 St",
            "8 Ave & W 31 St",
        ],
        demographics: true,
        trips: 1500,
    },
    City {
        file: "washington.csv",
        stations: &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dr & 14th St SW",
            "Massachusetts Ave & Dupont Circle NW",
            "15th & P St NW",
        ],
        demographics: false,
        trips: 1000,
    },
];

fn random_start(rng: &mut SimpleRng) -> Option<NaiveDateTime> {
    let month = 1 + rng.below(6) as u32;
    let day = 1 + rng.below(28) as u32;
    // Commute peaks at 8 and 17 for roughly half the trips.
    let hour = match rng.below(4) {
        0 => 8,
        1 => 17,
        _ => rng.below(24) as u32,
    };
    NaiveDate::from_ymd_opt(2017, month, day)?.and_hms_opt(
        hour,
        rng.below(60) as u32,
        rng.below(60) as u32,
    )
}

fn write_city(dir: &Path, city: &City, rng: &mut SimpleRng) -> Result<usize> {
    let path = dir.join(city.file);
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if city.demographics {
        header.extend(["Gender", "Birth Year"]);
    }
    writer.write_record(&header)?;

    for id in 0..city.trips {
        let start = random_start(rng).context("generating start time")?;
        let duration = 60 + rng.below(3600) as i64;
        let end = start + TimeDelta::seconds(duration);
        let user_type = if rng.below(5) == 0 { "Customer" } else { "Subscriber" };

        let mut record = vec![
            id.to_string(),
            start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration.to_string(),
            rng.pick(city.stations).to_string(),
            rng.pick(city.stations).to_string(),
            user_type.to_string(),
        ];
        if city.demographics {
            // Customers rarely report demographics.
            if user_type == "Customer" {
                record.extend([String::new(), String::new()]);
            } else {
                record.push(rng.pick(&["Male", "Female"]).to_string());
                record.push(format!("{}.0", 1950 + rng.below(50)));
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(city.trips)
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for city in &CITIES {
        let n = write_city(&dir, city, &mut rng)?;
        println!("Wrote {n} trips to {}", dir.join(city.file).display());
    }
    Ok(())
}
