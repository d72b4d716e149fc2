use std::rc::Rc;

use anyhow::{Context, Result};

use bitext_scorer::{
    Alignment, ScorerConfig, Sentence, SentencePairScorer, TranslationTableScore,
};

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ScorerConfig::from_path(&path)
            .with_context(|| format!("Failed to read scorer config {}", path))?,
        None => ScorerConfig::default(),
    };

    let dictionary = Rc::new(TranslationTableScore::from_entries(vec![
        ("the", "le", 1.0),
        ("the", "la", 1.0),
        ("cat", "chat", 1.0),
        ("sat", "assis", 0.9),
        ("house", "maison", 0.9),
        ("is", "est", 0.8),
        ("red", "rouge", 0.9),
    ]));

    let training = vec![
        Alignment::new(
            Sentence::from_text("the cat sat", 0),
            Sentence::from_text("le chat était assis", 0),
            true,
        ),
        Alignment::new(
            Sentence::from_text("the house is red", 1),
            Sentence::from_text("la maison est rouge", 1),
            true,
        ),
        Alignment::new(
            Sentence::from_text("dogs run fast", 2),
            Sentence::from_text("completely unrelated text", 5),
            false,
        ),
        Alignment::new(
            Sentence::from_text("Where is it ?", 3),
            Sentence::from_text("Le chat , le chat , le chat", 0),
            false,
        ),
    ];

    let mut scorer = SentencePairScorer::new(config);
    scorer
        .train(&training, dictionary.clone())
        .context("Training the sentence pair scorer failed")?;

    let path = std::env::temp_dir().join("bitext_scorer_demo.json");
    scorer.save(&path)?;
    let restored = SentencePairScorer::from_path(&path, dictionary)?;

    let source = Sentence::from_text("the cat is red", 4);
    for (text, position) in [
        ("le chat est rouge", 4),
        ("la maison", 4),
        ("completely unrelated text", 9),
    ] {
        let target = Sentence::from_text(text, position);
        println!(
            "{:>28} -> {:.4}",
            text,
            restored.score(&source, &target)?
        );
    }

    Ok(())
}
