use std::path::PathBuf;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

const PRODUCTS: [&str; 6] = [
    "hypothetical protein",
    "outer membrane protein",
    "DNA gyrase subunit A",
    "type III secretion system protein",
    "50S ribosomal protein L7/L12",
    "inclusion membrane protein",
];

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_proteomics.csv"));

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;

    writer.write_record([
        "CTL##",
        "Protein Description",
        "Peptide Matches",
        "Fold Change (RifR/GspE)",
        "P-value",
    ])?;

    let n_rows = 200;
    for i in 1..=n_rows {
        let ctl = format!("CTL{:04}", i);

        // Roughly one in ten rows is a control without an accession.
        let description = if rng.below(10) == 0 {
            format!("control_{i} spiked standard")
        } else {
            let accession = 61000 + rng.below(5000);
            let product = PRODUCTS[rng.below(PRODUCTS.len() as u64) as usize];
            format!("gb|AGJ{accession}.{} {product}", 1 + rng.below(2))
        };

        let peptide_matches = rng.below(12);
        let fold_change = rng.gauss(0.0, 1.6);
        let p_value = rng.next_f64().powi(2);

        writer.write_record([
            ctl,
            description,
            peptide_matches.to_string(),
            format!("{fold_change:.3}"),
            format!("{p_value:.4}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} proteomics rows to {}", output.display());
    Ok(())
}
