//! The `foresight init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("foresight.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("questions")?;
    write_if_missing(Path::new("questions/example.toml"), EXAMPLE_QUESTION_SET)?;

    std::fs::create_dir_all("forecasts")?;
    write_if_missing(Path::new("forecasts/example.toml"), EXAMPLE_FORECASTS)?;

    println!("\nNext steps:");
    println!("  1. Run: foresight validate --questions questions/example.toml");
    println!(
        "  2. Run: foresight score --questions questions/example.toml --forecasts forecasts/example.toml"
    );
    println!("  3. Run: foresight score --questions questions/example.toml --simulate --seed 42");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# foresight configuration

# "fail-fast" aborts on the first unscorable question, "skip" leaves it out.
failure_policy = "fail-fast"
output_dir = "./foresight-results"

[scoring]
max_days = 365
# "clamp" caps date errors at the horizon; "unclamped" lets them exceed 1.
date_clamp = "clamp"

[simulation]
seed = 42
binary_min = 0.4
binary_max = 0.9
date_anchor = "2024-01-01"
date_span_days = 365
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
id = "example"
name = "Example Question Set"
description = "Ten resolved questions mixing binary, date and choice outcomes"

[[questions]]
id = "Question 1"
type = "binary"
outcome = 1

[[questions]]
id = "Question 2"
type = "binary"
outcome = 0

[[questions]]
id = "Question 3"
type = "date"
outcome = "2024-12-31"

[[questions]]
id = "Question 4"
type = "binary"
outcome = 1

[[questions]]
id = "Question 5"
type = "binary"
outcome = 0

[[questions]]
id = "Question 6"
type = "choice"
outcome = "Alice"
choices = ["Alice", "Bob", "Charlie"]

[[questions]]
id = "Question 7"
type = "binary"
outcome = 0

[[questions]]
id = "Question 8"
type = "date"
outcome = "2024-06-30"

[[questions]]
id = "Question 9"
type = "choice"
outcome = "Charlie"
choices = ["Alice", "Bob", "Charlie"]

[[questions]]
id = "Question 10"
type = "binary"
outcome = 1
"#;

const EXAMPLE_FORECASTS: &str = r#"forecaster = "example"

[forecasts]
"Question 1" = 0.8
"Question 2" = 0.3
"Question 3" = "2024-12-01"
"Question 4" = 0.7
"Question 5" = 0.4
"Question 7" = 0.2
"Question 8" = "2024-07-15"
"Question 10" = 0.9

[forecasts."Question 6"]
Alice = 0.6
Bob = 0.3
Charlie = 0.1

[forecasts."Question 9"]
Alice = 0.2
Bob = 0.2
Charlie = 0.6
"#;
