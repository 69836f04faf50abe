use featurize::tokenizer::StrSource;
use featurize::{
    build_streams, CondensedDistanceMatrix, FeatureOptions, Metric, NGramTokenizer, NormalizeStrategy,
    ReduceOptions, StreamSet, WordTokenizer,
};

fn print_matrix(names: &[&str], d: &CondensedDistanceMatrix) {
    for (i, name) in names.iter().enumerate() {
        let row: Vec<String> = d.row(i).map(|v| format!("{v:.3}")).collect();
        println!("{name:>8}: {}", row.join("  "));
    }
}

fn main() -> featurize::Result<()> {
    let docs = [
        ("hamlet", "to be or not to be that is the question"),
        ("macbeth", "tomorrow and tomorrow and tomorrow creeps in this petty pace"),
        ("lear", "nothing will come of nothing speak again"),
        ("othello", "to be once in doubt is once to be resolved"),
    ];
    let names: Vec<&str> = docs.iter().map(|(name, _)| *name).collect();

    let streams = build_streams(&WordTokenizer::new(), docs.iter().map(|(_, text)| StrSource::new(*text)))?;
    let set = StreamSet::with_names(names.iter().copied().zip(streams))?;
    println!("{} documents, {} distinct words", set.len(), set.total().len());
    for (word, count) in set.total().most_common(Some(3)) {
        println!("  {word}: {count}");
    }

    let opts = FeatureOptions::new().with_normalize(NormalizeStrategy::TfIdf);
    let features = set.features(&opts)?;
    println!("\ncosine distance over tf-idf words");
    print_matrix(&names, &features.pdist(None, &Metric::Cosine)?);

    let bigrams = build_streams(&NGramTokenizer::bigrams(), docs.iter().map(|(_, text)| StrSource::new(*text)))?;
    let set = StreamSet::new(bigrams)?;
    let opts = FeatureOptions::new()
        .with_reduce(ReduceOptions::new().min_freq(0.5))
        .with_normalize(NormalizeStrategy::None);
    let features = set.features(&opts)?;
    println!("\nbigrams shared by at least half of the documents:");
    for gram in features.index().iter() {
        println!("  {}", gram.join(" "));
    }
    Ok(())
}
