use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct Row {
    work_year: i64,
    experience_level: &'static str,
    employment_type: &'static str,
    job_title: &'static str,
    salary_in_usd: i64,
    employee_residence: &'static str,
    remote_ratio: i64,
    company_location: &'static str,
    company_size: &'static str,
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

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let years = [2020i64, 2021, 2022, 2023];
    let remote_ratios = [0i64, 50, 100];
    let countries = ["US", "FR", "GB", "DE", "CA", "IN", "ES"];
    let sizes = ["S", "M", "L"];
    let employment_types = ["FT", "FT", "FT", "FT", "PT", "CT", "FL"];

    // (title, weight, base salary) – weights skew the title frequency the
    // way the survey data does.
    let titles: [(&str, usize, f64); 8] = [
        ("Data Scientist", 8, 110_000.0),
        ("Data Engineer", 7, 115_000.0),
        ("Data Analyst", 6, 75_000.0),
        ("Machine Learning Engineer", 4, 130_000.0),
        ("Research Scientist", 2, 120_000.0),
        ("Analytics Engineer", 2, 105_000.0),
        ("BI Developer", 1, 70_000.0),
        ("Data Architect", 1, 140_000.0),
    ];
    let title_pool: Vec<(&str, f64)> = titles
        .iter()
        .flat_map(|&(title, weight, base)| std::iter::repeat((title, base)).take(weight))
        .collect();

    // (level, salary multiplier)
    let levels: [(&str, f64); 4] = [("EN", 0.55), ("MI", 0.85), ("SE", 1.2), ("EX", 1.7)];
    let size_factor = |size: &str| match size {
        "S" => 0.8,
        "L" => 1.1,
        _ => 1.0,
    };
    let country_factor = |country: &str| match country {
        "US" => 1.3,
        "IN" => 0.35,
        "FR" | "ES" => 0.75,
        _ => 1.0,
    };

    let output_path = "data/ds_salaries.csv";
    std::fs::create_dir_all("data").context("creating data directory")?;
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;

    let n_rows = 2000;
    for _ in 0..n_rows {
        let year = *rng.pick(&years);
        let &(title, base) = rng.pick(&title_pool);
        let &(level, level_factor) = rng.pick(&levels);
        let country = *rng.pick(&countries);
        let size = *rng.pick(&sizes);

        // Salaries drift upward a little each survey year.
        let year_factor = 1.0 + 0.04 * (year - 2020) as f64;
        let mean = base * level_factor * size_factor(size) * country_factor(country) * year_factor;
        let salary = rng.gauss(mean, mean * 0.15).max(1000.0) as i64;

        writer
            .serialize(Row {
                work_year: year,
                experience_level: level,
                employment_type: *rng.pick(&employment_types),
                job_title: title,
                salary_in_usd: salary,
                employee_residence: country,
                remote_ratio: *rng.pick(&remote_ratios),
                company_location: country,
                company_size: size,
            })
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {n_rows} salary records to {output_path}");
    Ok(())
}
