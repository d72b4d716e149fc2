//! Integration tests for the numeric helpers and the feature extractor.

use std::rc::Rc;

use bitext_scorer::features::{word_match, FeatureExtractor};
use bitext_scorer::math::{logistic, ratio};
use bitext_scorer::{
    CachedWordPairScore, FeatureConfig, Sentence, SentencePair, TranslationTableScore,
    WordPairScore,
};

fn exact(a: &str, b: &str) -> f64 {
    if a == b {
        0.0
    } else {
        1.0
    }
}

fn pair(a: &str, b: &str) -> SentencePair {
    SentencePair::new(Sentence::from_text(a, 0), Sentence::from_text(b, 0))
}

// ---------------------------------------------------------------------------
// ratio / logistic
// ---------------------------------------------------------------------------

#[test]
fn ratio_properties() {
    for x in 1..20 {
        assert_eq!(ratio(x, x), 1.0);
        assert_eq!(ratio(0, x), 0.0);
        for y in 0..20 {
            let r = ratio(x, y);
            assert_eq!(r, ratio(y, x));
            assert!((0.0..=1.0).contains(&r));
        }
    }
    assert_eq!(ratio(0, 0), 0.0);
}

#[test]
fn logistic_properties() {
    assert_eq!(logistic(0.0), 0.5);
    let xs: Vec<f64> = (-40..=40).map(|i| i as f64 * 0.25).collect();
    for w in xs.windows(2) {
        assert!(logistic(w[0]) < logistic(w[1]));
    }
    for &x in &xs {
        assert!((logistic(x) + logistic(-x) - 1.0).abs() < 1e-12);
    }
}

// ---------------------------------------------------------------------------
// word_match
// ---------------------------------------------------------------------------

#[test]
fn word_match_identity() {
    for text in ["a", "the cat sat", "la la la land", "Hello , world ?"] {
        assert_eq!(word_match(&pair(text, text), &exact), 0.0, "{}", text);
    }
}

#[test]
fn word_match_short_circuit() {
    // |1 - 4| = 3 > 2 * 1
    assert_eq!(word_match(&pair("one", "uno dos tres cuatro"), &exact), 1.0);
    // same difference with the target as the shorter side
    assert_eq!(word_match(&pair("uno dos tres cuatro", "one"), &exact), 1.0);
    // |2 - 6| = 4 is not above 2 * 2, so matching runs
    let cost = word_match(&pair("x y", "x y a b c d"), &exact);
    assert!((cost - 4.0 / 6.0).abs() < 1e-12);
}

#[test]
fn word_match_is_greedy_not_optimal() {
    // "s1" grabs "t1" (0.1) although the optimal matching would give it "t2"
    // and let "s2" take "t1" (0.0).
    let scorer = |a: &str, b: &str| match (a, b) {
        ("s1", "t1") => 0.1,
        ("s1", "t2") => 0.2,
        ("s2", "t1") => 0.0,
        _ => 1.0,
    };
    let cost = word_match(&pair("s1 s2", "t1 t2"), &scorer);
    assert!((cost - (0.1 + 2.0) / 2.0).abs() < 1e-12);
}

#[test]
fn cached_scorer_gives_same_features() {
    let table = || {
        TranslationTableScore::from_entries(vec![("house", "maison", 0.8), ("red", "rouge", 0.9)])
    };
    let plain = FeatureExtractor::new(Rc::new(table()), FeatureConfig::with_linear_features())
        .unwrap();
    let cached = FeatureExtractor::new(
        Rc::new(CachedWordPairScore::new(table())),
        FeatureConfig::with_linear_features(),
    )
    .unwrap();

    let p = pair("the red house", "la maison rouge");
    assert_eq!(plain.extract(&p), cached.extract(&p));
    assert!(cached.word_pair_score().translations().is_some());
}
