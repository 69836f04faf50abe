use featurize::tokenizer::{ReaderSource, StrSource};
use featurize::{
    delete_features, CondensedDistanceMatrix, FeatureSet, NGramTokenizer, ReduceOptions, Stream, Tokenizer,
    WordTokenizer,
};
use proptest::prelude::*;

fn token_lists() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec("[a-f]{1,2}", 0..12), 1..6)
}

proptest! {
    #[test]
    fn prop_chunked_words_match_whole_split(
        text in "[a-zé€ \t\n]{0,200}",
        chunk in 1usize..64
    ) {
        let expected: Vec<String> = text.split_whitespace().map(String::from).collect();

        let tk = WordTokenizer::with_chunk_size(chunk).unwrap();
        let from_str = tk.tokenize(StrSource::new(text.as_str())).collect::<Result<Vec<_>, _>>().unwrap();
        prop_assert_eq!(&from_str, &expected);

        let from_bytes = tk.tokenize(ReaderSource::new(text.as_bytes())).collect::<Result<Vec<_>, _>>().unwrap();
        prop_assert_eq!(&from_bytes, &expected);
    }

    #[test]
    fn prop_ngram_windows(
        words in prop::collection::vec("[a-z]{1,4}", 0..20),
        n in 1usize..6
    ) {
        let text = words.join(" ");
        let grams = NGramTokenizer::new(n)
            .unwrap()
            .tokenize(StrSource::new(text.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        prop_assert_eq!(grams.len(), (words.len() + 1).saturating_sub(n));
        for (k, gram) in grams.iter().enumerate() {
            prop_assert_eq!(gram.as_slice(), &words[k..k + n]);
        }
    }

    #[test]
    fn prop_stream_addition_commutes_and_associates(lists in token_lists()) {
        let s: Vec<Stream<String>> = lists.into_iter().map(Stream::from_tokens).collect();
        let a = &s[0];
        let b = s.get(1).unwrap_or(a);
        let c = s.get(2).unwrap_or(b);
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(&(a + b) + c, a + &(b + c));
        prop_assert_eq!((a + b).total(), a.total() + b.total());
    }

    #[test]
    fn prop_vectors_hold_stream_counts(lists in token_lists()) {
        let streams: Vec<Stream<String>> = lists.into_iter().map(Stream::from_tokens).collect();
        let set = FeatureSet::raw(&streams).unwrap();
        for (i, stream) in streams.iter().enumerate() {
            for (j, token) in set.index().iter().enumerate() {
                prop_assert_eq!(set.vectors()[i][j], stream.count(token) as f64);
            }
            let row_sum: f64 = set.vectors()[i].iter().sum();
            prop_assert_eq!(row_sum, stream.total() as f64);
        }
    }

    #[test]
    fn prop_reduction_bounds(lists in token_lists()) {
        let streams: Vec<Stream<String>> = lists.into_iter().map(Stream::from_tokens).collect();
        let vectors = FeatureSet::raw(&streams).unwrap().into_parts().1;
        let width = vectors[0].len();

        let (same, map) = delete_features(&vectors, &ReduceOptions::new()).unwrap();
        prop_assert_eq!(&same, &vectors);
        prop_assert!(map.is_identity());

        let (_, map) = delete_features(&vectors, &ReduceOptions::new().max_freq(1.0)).unwrap();
        prop_assert_eq!(map.len(), width);

        let grand_total: u64 = streams.iter().map(Stream::total).sum();
        let (emptied, map) = delete_features(&vectors, &ReduceOptions::new().min_occ(grand_total as f64 + 1.0)).unwrap();
        prop_assert!(map.is_empty());
        prop_assert!(emptied.iter().all(Vec::is_empty));
    }

    #[test]
    fn prop_condensed_square_round_trip(
        (n, values) in (0usize..8).prop_flat_map(|n| {
            (Just(n), prop::collection::vec(0.0f64..100.0, n * n.saturating_sub(1) / 2))
        })
    ) {
        let m = CondensedDistanceMatrix::new(n, values).unwrap();
        let square = m.squareform();
        for i in 0..n {
            prop_assert_eq!(m.get(i, i), 0.0);
            for j in 0..n {
                prop_assert_eq!(m.get(i, j), m.get(j, i));
                prop_assert_eq!(square.get(i, j), m.get(i, j));
            }
        }
        prop_assert_eq!(CondensedDistanceMatrix::from_square(&square).unwrap(), m);
    }
}
