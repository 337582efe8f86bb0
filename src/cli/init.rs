//! `init` command: write a starter retrocode.toml

use anyhow::{bail, Result};
use console::style;
use std::path::Path;

const EXAMPLE_CONFIG: &str = r#"# retrocode.toml
#
# Environment variables override these values. The backend's API key is
# always taken from the environment (GROQ_API_KEY for groq).

[model]
backend = "groq"          # groq | openai | openrouter | ollama
# model = "llama-3.1-70b-versatile"
temperature = 0.1
max_tokens = 4000
top_p = 0.9
timeout_secs = 30

[limits]
max_code_length = 500000
min_code_length = 10
"#;

pub(crate) fn run() -> Result<()> {
    let path = Path::new("retrocode.toml");
    if path.exists() {
        bail!("retrocode.toml already exists, not overwriting");
    }
    std::fs::write(path, EXAMPLE_CONFIG)?;
    println!("{} retrocode.toml", style("Created").green().bold());
    Ok(())
}
