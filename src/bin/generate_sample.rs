use chrono::{Datelike, Days, NaiveDate};

use avocado_ols::config::AVOCADO_REGIONS;

const WEEKS: u64 = 169;

// Generating weights for the price model.
const W_MONTH: f64 = 0.015;
const W_YEAR: f64 = 0.08;
const W_VOLUME: f64 = -2.0e-7;
const W_ORGANIC: f64 = 0.45;
const W_INTERCEPT: f64 = -160.0;
const NOISE: f64 = 0.05;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Fixed regional price offset, spread over ±0.3.
fn region_effect(index: usize) -> f64 {
    if index == 0 {
        return 0.0;
    }
    ((index * 37) % 61) as f64 / 100.0 - 0.3
}

fn main() {
    let output_path = std::env::args().nth(1).unwrap_or_else(|| "avocado.csv".to_string());
    let mut rng = SimpleRng::new(42);
    let first_week = NaiveDate::from_ymd_opt(2015, 1, 4).expect("valid start date");

    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    writer
        .write_record([
            "", "Date", "AveragePrice", "Total Volume", "4046", "4225", "4770", "Total Bags",
            "Small Bags", "Large Bags", "XLarge Bags", "type", "year", "region",
        ])
        .expect("Failed to write header");

    let mut rows = 0usize;
    for (r, region) in AVOCADO_REGIONS.iter().enumerate() {
        let scale = if *region == "TotalUS" { 3.0e7 } else { 1.0e5 * (1.0 + (r % 9) as f64) };

        for kind in ["conventional", "organic"] {
            let organic = kind == "organic";
            for (week_idx, week) in (0..WEEKS).enumerate() {
                let date = first_week + Days::new(7 * week);
                let volume = scale * if organic { 0.03 } else { 1.0 } * (1.0 + 0.2 * rng.next_f64());

                let price = W_INTERCEPT
                    + W_MONTH * f64::from(date.month())
                    + W_YEAR * f64::from(date.year())
                    + W_VOLUME * volume
                    + if organic { W_ORGANIC } else { 0.0 }
                    + region_effect(r)
                    + rng.gauss(0.0, NOISE);

                let plu_4046 = volume * 0.35;
                let plu_4225 = volume * 0.30;
                let plu_4770 = volume * 0.02;
                let bags = volume - plu_4046 - plu_4225 - plu_4770;
                let small = bags * 0.75;
                let large = bags * 0.23;
                let xlarge = bags - small - large;

                writer
                    .write_record([
                        week_idx.to_string(),
                        date.format("%Y-%m-%d").to_string(),
                        format!("{price:.2}"),
                        format!("{volume:.2}"),
                        format!("{plu_4046:.2}"),
                        format!("{plu_4225:.2}"),
                        format!("{plu_4770:.2}"),
                        format!("{bags:.2}"),
                        format!("{small:.2}"),
                        format!("{large:.2}"),
                        format!("{xlarge:.2}"),
                        kind.to_string(),
                        date.year().to_string(),
                        region.to_string(),
                    ])
                    .expect("Failed to write row");
                rows += 1;
            }
        }
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {rows} rows to {output_path}");
    println!(
        "Generating weights: Month {W_MONTH}, year {W_YEAR}, Total Volume {W_VOLUME}, \
         type_dummy {W_ORGANIC}, intercept {W_INTERCEPT}, noise sd {NOISE}"
    );
}
