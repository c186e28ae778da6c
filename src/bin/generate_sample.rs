//! Writes `sample_data.txt`, a synthetic experimental point in the same
//! layout as the acquisition system output.

use std::f64::consts::PI;

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

const HEADER_LINES: usize = 23;
const SAMPLES: usize = 2000;
/// Sampling interval in seconds.
const DT: f64 = 0.01;
/// Slug passage frequency in Hz.
const SLUG_FREQ: f64 = 0.8;

const COLUMNS: [&str; 9] = [
    "X_Value",
    "J_SF6",
    "J_Oleo",
    "PDT-M-0101C-3kPa_mA",
    "PDT-M-0101B-10kPa_mA",
    "PDT-M-0101-40kPa_mA",
    "Gamma-Ray D",
    "Temperatura (°C)",
    "Comment",
];

fn metadata_block() -> Vec<String> {
    let mut lines = vec![
        "LabVIEW Measurement\t".to_string(),
        "Writer_Version\t2".to_string(),
        "Reader_Version\t2".to_string(),
        "Separator\tTab".to_string(),
        "Decimal_Separator\t,".to_string(),
        "Multi_Headings\tNo".to_string(),
        "X_Columns\tOne".to_string(),
        "Time_Pref\tRelative".to_string(),
        "Operator\tLaboratório".to_string(),
        "Date\t2024/03/14".to_string(),
        "Time\t10:21:07,5".to_string(),
        "***End_of_Header***\t".to_string(),
    ];
    lines.push(String::new());
    lines.push(format!("Channels\t{}", COLUMNS.len() - 2));
    lines.push(format!("Samples\t{SAMPLES}"));
    lines.push("Date\t2024/03/14".to_string());
    lines.push("Time\t10:21:07,5".to_string());
    lines.push("Y_Unit_Label\tmA".to_string());
    lines.push("X_Dimension\tTime".to_string());
    lines.push("X0\t0,0000000000000000E+0".to_string());
    lines.push(format!("Delta_X\t{}", comma(DT, 6)));
    lines.push("***End_of_Header***\t".to_string());
    while lines.len() < HEADER_LINES {
        lines.push(String::new());
    }
    lines
}

fn comma(v: f64, decimals: usize) -> String {
    format!("{v:.decimals$}").replace('.', ",")
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut text = String::new();

    for line in metadata_block() {
        text.push_str(&line);
        text.push_str("\r\n");
    }
    text.push_str(&COLUMNS.join("\t"));
    text.push_str("\r\n");

    for i in 0..SAMPLES {
        let t = i as f64 * DT;
        let phase = (2.0 * PI * SLUG_FREQ * t).sin();
        // Gas-rich slug body lowers the holdup reading and raises dp.
        let slug = (phase > 0.3) as u8 as f64;

        let jg = rng.gauss(0.85, 0.02);
        let jl = rng.gauss(0.40, 0.01);
        let dp3 = 4.0 + 12.0 * (0.45 + 0.35 * phase).clamp(0.0, 1.0) + rng.gauss(0.0, 0.15);
        let dp10 = 4.0 + 16.0 * (0.14 + 0.10 * phase) + rng.gauss(0.0, 0.05);
        let dp40 = 4.0 + 16.0 * (0.035 + 0.025 * phase) + rng.gauss(0.0, 0.02);
        let gamma = 2.1 + 0.9 * slug + rng.gauss(0.0, 0.05);
        let temp = 25.0 + 0.002 * t + rng.gauss(0.0, 0.03);

        let fields = [
            comma(t, 6),
            comma(jg, 6),
            comma(jl, 6),
            comma(dp3, 6),
            comma(dp10, 6),
            comma(dp40, 6),
            comma(gamma, 6),
            comma(temp, 6),
            String::new(),
        ];
        text.push_str(&fields.join("\t"));
        text.push_str("\r\n");
    }

    // Latin-1: every character written above fits in one byte.
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .collect();

    let output_path = "sample_data.txt";
    std::fs::write(output_path, bytes).with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {SAMPLES} samples ({} columns) to {output_path}",
        COLUMNS.len()
    );
    Ok(())
}
