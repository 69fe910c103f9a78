use anyhow::Result;
use docrag::config::Config;
use std::path::PathBuf;

pub fn init_config(path: PathBuf) -> Result<()> {
    let config = Config::default();
    let config_path = path.join("docrag.toml");

    if config_path.exists() {
        anyhow::bail!("Configuration file already exists: {}", config_path.display());
    }

    let toml_content = format!(
        r#"# docrag configuration

[chunking]
max_words = {}
overlap_words = {}

[embedding]
backend = "hashed"
dimensions = {}
# backend = "http"
# endpoint = "http://localhost:1234/v1/embeddings"
# model = "all-MiniLM-L6-v2"
# dimensions = 384

[retrieval]
candidate_count = {}
min_fetch = {}
normalization = "min_max"
dedup = "exact"
parallel = true
reranker = "embedding"
validate_answers = false

[generation]
default_provider = "groq"
timeout_secs = {}

[generation.routes]
# summarization = "openai"

[generation.groq]
endpoint = "{}"
model = "{}"
api_key_env = "GROQ_API_KEY"

[generation.openai]
endpoint = "{}"
model = "{}"
api_key_env = "OPENAI_API_KEY"

[logging]
format = "text"
level = "info"
"#,
        config.chunking.max_words,
        config.chunking.overlap_words,
        config.embedding.dimensions(),
        config.retrieval.candidate_count,
        config.retrieval.min_fetch,
        config.generation.timeout_secs,
        config.generation.groq.endpoint,
        config.generation.groq.model,
        config.generation.openai.endpoint,
        config.generation.openai.model,
    );

    std::fs::create_dir_all(&path)?;
    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}
