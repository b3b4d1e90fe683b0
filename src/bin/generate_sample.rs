use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per-species measurement distributions: (mean, std dev).
struct SpeciesProfile {
    name: &'static str,
    islands: &'static [&'static str],
    count: usize,
    bill_length_mm: (f64, f64),
    bill_depth_mm: (f64, f64),
    flipper_length_mm: (f64, f64),
    body_mass_g: (f64, f64),
}

const PROFILES: [SpeciesProfile; 3] = [
    SpeciesProfile {
        name: "Adelie",
        islands: &["Torgersen", "Biscoe", "Dream"],
        count: 152,
        bill_length_mm: (38.8, 2.7),
        bill_depth_mm: (18.3, 1.2),
        flipper_length_mm: (190.0, 6.5),
        body_mass_g: (3700.0, 460.0),
    },
    SpeciesProfile {
        name: "Gentoo",
        islands: &["Biscoe"],
        count: 124,
        bill_length_mm: (47.5, 3.1),
        bill_depth_mm: (15.0, 1.0),
        flipper_length_mm: (217.0, 6.5),
        body_mass_g: (5076.0, 504.0),
    },
    SpeciesProfile {
        name: "Chinstrap",
        islands: &["Dream"],
        count: 68,
        bill_length_mm: (48.8, 3.3),
        bill_depth_mm: (18.4, 1.1),
        flipper_length_mm: (196.0, 7.1),
        body_mass_g: (3733.0, 384.0),
    },
];

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
    fn gauss(&mut self, (mean, std_dev): (f64, f64)) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[(self.next_u64() % choices.len() as u64) as usize]
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut species: Vec<&str> = Vec::new();
    let mut island: Vec<&str> = Vec::new();
    let mut bill_length: Vec<Option<f64>> = Vec::new();
    let mut bill_depth: Vec<Option<f64>> = Vec::new();
    let mut flipper_length: Vec<Option<i64>> = Vec::new();
    let mut body_mass: Vec<Option<i64>> = Vec::new();
    let mut sex: Vec<Option<&str>> = Vec::new();
    let mut year: Vec<i64> = Vec::new();

    for profile in &PROFILES {
        for i in 0..profile.count {
            // Roughly one record in fifty has no measurements at all.
            let missing = rng.next_f64() < 0.02;

            species.push(profile.name);
            island.push(rng.pick(profile.islands));
            year.push(2007 + (i % 3) as i64);

            if missing {
                bill_length.push(None);
                bill_depth.push(None);
                flipper_length.push(None);
                body_mass.push(None);
                sex.push(None);
                continue;
            }
            bill_length.push(Some(round1(rng.gauss(profile.bill_length_mm))));
            bill_depth.push(Some(round1(rng.gauss(profile.bill_depth_mm))));
            flipper_length.push(Some(rng.gauss(profile.flipper_length_mm).round() as i64));
            body_mass.push(Some((rng.gauss(profile.body_mass_g) / 25.0).round() as i64 * 25));
            sex.push(Some(if i % 2 == 0 { "male" } else { "female" }));
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Int64, true),
        Field::new("body_mass_g", DataType::Int64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int64, false),
    ]));

    let rows = species.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(species)),
            Arc::new(StringArray::from(island)),
            Arc::new(Float64Array::from(bill_length)),
            Arc::new(Float64Array::from(bill_depth)),
            Arc::new(Int64Array::from(flipper_length)),
            Arc::new(Int64Array::from(body_mass)),
            Arc::new(StringArray::from(sex)),
            Arc::new(Int64Array::from(year)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "sample_penguins.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {rows} penguins to {output_path}");
    Ok(())
}
