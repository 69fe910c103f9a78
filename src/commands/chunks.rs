use anyhow::Result;
use docrag::chunking::TextSplitter;
use docrag::config::Config;
use docrag::content::{clean_text, DocumentSource, FolderSource};
use docrag::types::Document;
use docrag::util::truncate_str;
use std::path::PathBuf;

pub fn show_chunks(config: Config, path: PathBuf) -> Result<()> {
    let splitter = TextSplitter::new(config.chunking.clone())?;
    let documents = FolderSource::new(&path).documents()?;

    let mut total = 0;
    for document in &documents {
        let cleaned = Document::new(document.id.clone(), clean_text(&document.content));
        let chunks = splitter.split_document(&cleaned)?;
        println!("{} ({} chunks)", document.id, chunks.len());
        for chunk in &chunks {
            println!(
                "  #{:<4} {:>4} words  {}",
                chunk.position,
                chunk.word_count(),
                truncate_str(&chunk.content, 80)
            );
        }
        total += chunks.len();
    }

    println!();
    println!("{} documents, {} chunks", documents.len(), total);
    Ok(())
}
