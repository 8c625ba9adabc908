//! Write a synthetic passenger table and a matching model artifact so the
//! `predict` command can be run without external files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use titanic_predict::classifier::{Feature, LogisticRegression, ModelArtifact, ModelSpec};
use titanic_predict::config::DEFAULT_MODELFILE;

#[derive(Parser)]
#[command(name = "generate_sample", about = "Write data/test.csv and a sample model artifact")]
struct Args {
    /// Number of passengers to generate
    #[arg(long, default_value = "418")]
    rows: usize,
    /// Output directory for test.csv
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
    /// Where to write the model artifact
    #[arg(long, default_value = DEFAULT_MODELFILE)]
    model_out: PathBuf,
    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const SURNAMES: [&str; 8] = [
    "Kelly", "Wilkes", "Myles", "Wirz", "Hirvonen", "Svensson", "Connolly", "Caldwell",
];

/// Hand-set coefficients roughly in line with published Titanic baselines.
fn sample_model() -> ModelArtifact {
    ModelArtifact::new(ModelSpec::LogisticRegression(LogisticRegression {
        features: vec![
            Feature::numeric("Pclass", 3.0),
            Feature::one_hot("Sex", "female"),
            Feature::numeric("Age", 29.7),
            Feature::numeric("SibSp", 0.0),
            Feature::numeric("Parch", 0.0),
            Feature::numeric("Fare", 14.45),
        ],
        coefficients: vec![-0.95, 2.6, -0.035, -0.3, -0.1, 0.003],
        intercept: 2.0,
        threshold: 0.5,
    }))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let csv_path = args.out_dir.join("test.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    writer.write_record([
        "PassengerId", "Pclass", "Name", "Sex", "Age", "SibSp", "Parch", "Ticket", "Fare",
        "Cabin", "Embarked",
    ])?;

    for i in 0..args.rows {
        let passenger_id = 892 + i;
        let pclass = *rng.pick(&[1u8, 2, 2, 3, 3, 3, 3]);
        let sex = *rng.pick(&["male", "male", "female"]);
        let title = if sex == "female" { "Mrs." } else { "Mr." };
        let name = format!("{}, {title} {}", rng.pick(&SURNAMES), passenger_id);

        // About a fifth of the ages are unknown, as in the real test set.
        let age = if rng.next_f64() < 0.2 {
            String::new()
        } else {
            let mean = match pclass {
                1 => 39.0,
                2 => 30.0,
                _ => 25.0,
            };
            format!("{:.1}", rng.gauss(mean, 13.0).clamp(0.5, 76.0))
        };

        let sibsp = if rng.next_f64() < 0.7 { 0 } else { 1 + rng.next_u64() % 3 };
        let parch = if rng.next_f64() < 0.75 { 0 } else { 1 + rng.next_u64() % 2 };
        let base_fare = match pclass {
            1 => 85.0,
            2 => 21.0,
            _ => 12.0,
        };
        let fare = (base_fare * (1.0 + rng.gauss(0.0, 0.35)).abs()).max(3.17);
        let cabin = if pclass == 1 && rng.next_f64() < 0.8 {
            format!("{}{}", rng.pick(&["A", "B", "C", "D", "E"]), rng.next_u64() % 120)
        } else {
            String::new()
        };
        let embarked = *rng.pick(&["S", "S", "S", "C", "Q"]);

        writer.write_record([
            passenger_id.to_string(),
            pclass.to_string(),
            name,
            sex.to_string(),
            age,
            sibsp.to_string(),
            parch.to_string(),
            format!("{}", 300_000 + rng.next_u64() % 50_000),
            format!("{fare:.4}"),
            cabin,
            embarked.to_string(),
        ])?;
    }
    writer.flush()?;

    if let Some(parent) = args.model_out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    sample_model().write(&args.model_out)?;

    println!(
        "Wrote {} passengers to {} and a logistic regression to {}",
        args.rows,
        csv_path.display(),
        args.model_out.display()
    );
    println!(
        "Run: titanic-predict predict --input {} --modelfile {}",
        csv_path.display(),
        args.model_out.display()
    );
    Ok(())
}
