use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const N_STUDENTS: usize = 1000;
const CSV_PATH: &str = "student_habits_performance.csv";
const PARQUET_PATH: &str = "student_habits_performance.parquet";

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

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// One line of the generated file, in the column order of the public dataset.
#[derive(Debug, Serialize)]
struct StudentRow {
    student_id: String,
    age: i64,
    gender: String,
    study_hours_per_day: f64,
    part_time_job: String,
    sleep_hours: f64,
    diet_quality: String,
    exercise_frequency: i64,
    /// Left blank for some students so cleaning has something to drop.
    parental_education_level: Option<String>,
    internet_quality: String,
    mental_health_rating: i64,
    exam_score: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<StudentRow> {
    (0..N_STUDENTS)
        .map(|i| {
            let study = round1(rng.gauss(3.5, 1.5).clamp(0.0, 8.3));
            let sleep = round1(rng.gauss(6.5, 1.2).clamp(3.2, 10.0));
            let job = rng.pick(&["No", "No", "No", "Yes"]);
            let diet = rng.pick(&["Fair", "Good", "Poor"]);
            let internet = rng.pick(&["Good", "Average", "Poor"]);
            let mental = rng.gauss(5.5, 2.5).round().clamp(1.0, 10.0) as i64;
            let exercise = (rng.next_u64() % 7) as i64;

            let mut score = 35.0 + 9.5 * study + 1.8 * mental as f64 + 1.2 * (sleep - 6.5);
            if job == "Yes" {
                score -= 2.0;
            }
            score += match diet {
                "Good" => 2.0,
                "Poor" => -2.0,
                _ => 0.0,
            };
            score += rng.gauss(0.0, 6.0);

            let education = if rng.next_f64() < 0.09 {
                None
            } else {
                Some(rng.pick(&["High School", "Bachelor", "Master"]).to_string())
            };

            StudentRow {
                student_id: format!("S{}", 1000 + i),
                age: 17 + (rng.next_u64() % 8) as i64,
                gender: rng.pick(&["Female", "Male", "Female", "Male", "Other"]).to_string(),
                study_hours_per_day: study,
                part_time_job: job.to_string(),
                sleep_hours: sleep,
                diet_quality: diet.to_string(),
                exercise_frequency: exercise,
                parental_education_level: education,
                internet_quality: internet.to_string(),
                mental_health_rating: mental,
                exam_score: round1(score.clamp(18.0, 100.0)),
            }
        })
        .collect()
}

fn write_csv(rows: &[StudentRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[StudentRow]) -> Result<()> {
    let text = |f: fn(&StudentRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&StudentRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(rows.iter().map(f)))
    };
    let int = |f: fn(&StudentRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(rows.iter().map(f)))
    };

    let education = StringArray::from(
        rows.iter()
            .map(|r| r.parental_education_level.as_deref())
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("student_id", DataType::Utf8, false),
        Field::new("age", DataType::Int64, false),
        Field::new("gender", DataType::Utf8, false),
        Field::new("study_hours_per_day", DataType::Float64, false),
        Field::new("part_time_job", DataType::Utf8, false),
        Field::new("sleep_hours", DataType::Float64, false),
        Field::new("diet_quality", DataType::Utf8, false),
        Field::new("exercise_frequency", DataType::Int64, false),
        Field::new("parental_education_level", DataType::Utf8, true),
        Field::new("internet_quality", DataType::Utf8, false),
        Field::new("mental_health_rating", DataType::Int64, false),
        Field::new("exam_score", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.student_id.as_str()),
            int(|r| r.age),
            text(|r| r.gender.as_str()),
            float(|r| r.study_hours_per_day),
            text(|r| r.part_time_job.as_str()),
            float(|r| r.sleep_hours),
            text(|r| r.diet_quality.as_str()),
            int(|r| r.exercise_frequency),
            Arc::new(education),
            text(|r| r.internet_quality.as_str()),
            int(|r| r.mental_health_rating),
            float(|r| r.exam_score),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    let incomplete = rows
        .iter()
        .filter(|r| r.parental_education_level.is_none())
        .count();
    println!(
        "Wrote {} students ({incomplete} with a blank cell) to {CSV_PATH} and {PARQUET_PATH}",
        rows.len()
    );
    Ok(())
}
