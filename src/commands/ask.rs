use anyhow::{Context, Result};
use docrag::config::Config;
use docrag::content::{DocumentSource, FolderSource};
use docrag::routing::ModelPreference;
use docrag::util::truncate_str;
use docrag::{Answer, AskOptions, RagPipeline};
use std::path::PathBuf;
use tracing::info;

pub fn build_options(
    model: &str,
    top_k: usize,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    rerank: bool,
) -> Result<AskOptions> {
    let preference: ModelPreference = model.parse().map_err(anyhow::Error::msg)?;
    let mut options = AskOptions::default()
        .with_top_k(top_k)
        .with_preference(preference)
        .with_rerank(rerank);
    if let Some(t) = temperature {
        options = options.with_temperature(t);
    }
    if let Some(m) = max_tokens {
        options = options.with_max_tokens(m);
    }
    Ok(options)
}

pub fn ask(config: Config, docs: PathBuf, query: String, options: AskOptions, json: bool) -> Result<()> {
    let documents = FolderSource::new(&docs).documents()?;
    info!("Indexing {} documents from {}", documents.len(), docs.display());

    let pipeline = RagPipeline::from_config(&config, &documents)
        .context("Failed to build retrieval pipeline")?;
    let answer = pipeline.ask(&query, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        print_answer(&answer);
    }
    Ok(())
}

fn print_answer(answer: &Answer) {
    println!("{}", answer.text.trim());
    println!();

    if answer.evidence.is_empty() {
        println!("No supporting passages found.");
        return;
    }

    println!("Sources ({} query):", answer.category);
    for (i, evidence) in answer.evidence.iter().enumerate() {
        println!(
            "  {}. {} [{} {:.3}]",
            i + 1,
            evidence.chunk.id(),
            evidence.method,
            evidence.score
        );
        println!("     {}", truncate_str(evidence.text(), 160));
    }

    if let Some(report) = &answer.grounding {
        println!();
        println!(
            "Grounding: max {:.3}, avg {:.3}",
            report.max_similarity, report.avg_similarity
        );
    }
}
