// tests/classify_props.rs
//
// Exhaustive check over every legend pattern up to length 6: the two lanes
// together hold each input exactly once, in input order.

use legend_feed::{classify, Article};

const LEGENDS: [Option<&str>; 3] = [None, Some(""), Some("musk")];

fn batches(max_len: u32) -> impl Iterator<Item = Vec<Article>> {
    (0..=max_len).flat_map(|len| {
        (0..3usize.pow(len)).map(move |mut code| {
            (0..len)
                .map(|i| {
                    let legend = LEGENDS[code % 3];
                    code /= 3;
                    Article {
                        title: format!("a{i}"),
                        legend: legend.map(str::to_string),
                        ..Default::default()
                    }
                })
                .collect::<Vec<Article>>()
        })
    })
}

fn index_of(a: &Article) -> usize {
    a.title[1..].parse().unwrap()
}

#[test]
fn lanes_are_a_stable_partition() {
    for batch in batches(6) {
        let n = batch.len();
        let expected_timeline = batch
            .iter()
            .filter(|a| a.legend.as_deref().is_some_and(|l| !l.is_empty()))
            .count();

        let lanes = classify(batch);
        assert_eq!(lanes.timeline.len(), expected_timeline);
        assert_eq!(lanes.timeline.len() + lanes.trending.len(), n);

        for lane in [&lanes.timeline, &lanes.trending] {
            let idx: Vec<usize> = lane.iter().map(index_of).collect();
            assert!(idx.windows(2).all(|w| w[0] < w[1]), "order kept: {idx:?}");
        }

        let mut all: Vec<usize> = lanes
            .timeline
            .iter()
            .chain(lanes.trending.iter())
            .map(index_of)
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..n).collect::<Vec<_>>());
    }
}

#[test]
fn routing_depends_on_legend_only() {
    let with = Article {
        title: "t".into(),
        legend: Some("altman".into()),
        ..Default::default()
    };
    let lanes = classify(vec![with.clone()]);
    assert_eq!(lanes.timeline, vec![with]);
    assert!(lanes.trending.is_empty());
}

#[test]
fn decoded_legend_routes_by_truthiness() {
    let batch: Vec<Article> = serde_json::from_str(
        r#"[
            {"title": "t", "legend": true},
            {"title": "z", "legend": 0},
            {"title": "f", "legend": false},
            {"title": "n", "legend": 3}
        ]"#,
    )
    .unwrap();
    let lanes = classify(batch);
    let titles = |v: &[Article]| v.iter().map(|a| a.title.clone()).collect::<Vec<_>>();
    assert_eq!(titles(&lanes.timeline), ["t", "n"]);
    assert_eq!(titles(&lanes.trending), ["z", "f"]);
}
